use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// 予約台帳の保存先
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum StorageBackend {
    /// PostgreSQL（起動時にマイグレーションを実行）
    #[default]
    Postgres,
    /// プロセス内メモリ（再起動で消える）
    Memory,
}

/// サーバー設定
///
/// コマンドライン引数と環境変数の両方から読み込む。引数が優先される。
#[derive(Debug, Clone, Parser)]
#[command(name = "item-lending")]
pub struct Config {
    #[arg(long, env = "DATABASE_URL", default_value = "postgres://localhost/item_lending")]
    pub database_url: String,

    #[arg(long, env = "PORT", default_value = "3000")]
    pub port: u16,

    #[arg(long, env = "DATABASE_MAX_CONNECTIONS", default_value = "5")]
    pub max_connections: u32,

    #[arg(long, env = "LEDGER_STORAGE", value_enum, default_value_t = StorageBackend::Postgres)]
    pub storage: StorageBackend,

    /// ユーザーとアイテムの初期データ（JSON）
    ///
    /// 未指定の場合、ユーザー・アイテムのカタログは空で起動する。
    #[arg(long, env = "LENDING_FIXTURES")]
    pub fixtures: Option<PathBuf>,
}

impl Config {
    pub fn bind_address(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::{CommandFactory, FromArgMatches};
    use std::ffi::OsStr;

    const ENV_BACKED_ARGS: [(&str, &str); 5] = [
        ("database_url", "DATABASE_URL"),
        ("port", "PORT"),
        ("max_connections", "DATABASE_MAX_CONNECTIONS"),
        ("storage", "LEDGER_STORAGE"),
        ("fixtures", "LENDING_FIXTURES"),
    ];

    /// 環境変数を参照せずに引数だけを解釈する
    fn parse_args(args: &[&str]) -> Result<Config, clap::Error> {
        let command = ENV_BACKED_ARGS
            .iter()
            .fold(Config::command(), |command, (id, _)| {
                command.mut_arg(*id, |arg| arg.env(None::<&'static str>))
            });
        let matches = command.try_get_matches_from(args)?;
        Config::from_arg_matches(&matches)
    }

    #[test]
    fn test_defaults_when_no_arguments() {
        let config = parse_args(&["item-lending"]).unwrap();

        assert_eq!(config.database_url, "postgres://localhost/item_lending");
        assert_eq!(config.port, 3000);
        assert_eq!(config.max_connections, 5);
        assert_eq!(config.storage, StorageBackend::Postgres);
        assert_eq!(config.fixtures, None);
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn test_arguments_override_defaults() {
        let config = parse_args(&[
            "item-lending",
            "--port",
            "8080",
            "--storage",
            "memory",
            "--database-url",
            "postgres://db/lending",
            "--fixtures",
            "seed.json",
        ])
        .unwrap();

        assert_eq!(config.port, 8080);
        assert_eq!(config.storage, StorageBackend::Memory);
        assert_eq!(config.database_url, "postgres://db/lending");
        assert_eq!(config.fixtures, Some(PathBuf::from("seed.json")));
    }

    #[test]
    fn test_rejects_unknown_storage() {
        let result = parse_args(&["item-lending", "--storage", "redis"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_environment_variable_names() {
        let command = Config::command();

        for (id, env) in ENV_BACKED_ARGS {
            let arg = command
                .get_arguments()
                .find(|arg| arg.get_id().as_str() == id)
                .unwrap();
            assert_eq!(arg.get_env(), Some(OsStr::new(env)), "{}", id);
        }
    }
}
