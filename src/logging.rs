use std::fmt::Display;

use colored::Colorize;
use log::{Level, SetLoggerError};

/// Set to "debug" to see debug output from our own crates
pub const LOG_LEVEL_VAR: &str = "RENDEZVOUS_LOG";

/// External crates only need to log warnings and errors
const EXTERNAL_LEVELS: [Level; 2] = [Level::Warn, Level::Error];

pub fn init_logger() -> Result<(), SetLoggerError> {
    let verbose = std::env::var(LOG_LEVEL_VAR)
        .map(|value| value.eq_ignore_ascii_case("debug"))
        .unwrap_or(false);

    fern::Dispatch::new()
        .format(move |out, message, record| {
            let target = Target::from_str(record.target());
            let now = chrono::Local::now();

            out.finish(format_args!(
                "{:^5} {} {:^8} {}",
                level_to_string(&record.level()),
                now.format("%H:%M:%S").to_string().bright_black(),
                target,
                message
            ))
        })
        .filter(move |meta| {
            let target = Target::from_str(meta.target());
            let local_level = if verbose { Level::Debug } else { Level::Info };

            if target.is_local() {
                meta.level() <= local_level
            } else {
                EXTERNAL_LEVELS.contains(&meta.level())
            }
        })
        .chain(std::io::stdout())
        .apply()
}

enum Target {
    External(String),
    Main,
    Server,
    Engine,
}

impl Target {
    fn from_str(str: &str) -> Self {
        let module = str.split("::").next().unwrap_or_default();

        match module {
            "rendezvous" => Self::Main,
            "rendezvous_server" => Self::Server,
            "rendezvous_core" => Self::Engine,
            other => Self::External(other.to_string()),
        }
    }

    fn is_local(&self) -> bool {
        !matches!(self, Self::External(_))
    }
}

impl Display for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let result = match self {
            Target::External(x) => x.as_str().clear(),
            Target::Main => "MAIN".bright_cyan(),
            Target::Server => "SERVER".bright_green(),
            Target::Engine => "ENGINE".blue(),
        };

        Display::fmt(&result, f)
    }
}

fn level_to_string(level: &Level) -> String {
    match level {
        Level::Error => " ERR ".black().on_red().bold().to_string(),
        Level::Warn => " WRN ".black().on_yellow().bold().to_string(),
        Level::Info => " INF ".black().on_blue().bold().to_string(),
        Level::Debug => " DBG ".white().on_black().to_string(),
        Level::Trace => " TRC ".to_string(),
    }
}

#[cfg(test)]
mod test {
    use super::Target;

    #[test]
    fn targets_are_grouped_by_crate() {
        assert!(matches!(
            Target::from_str("rendezvous_core::rooms"),
            Target::Engine
        ));
        assert!(matches!(
            Target::from_str("rendezvous_server::relay"),
            Target::Server
        ));
        assert!(matches!(Target::from_str("rendezvous"), Target::Main));
        assert!(!Target::from_str("hyper::proto").is_local());
    }
}
