use fern::colors::{Color, ColoredLevelConfig};
use log::{Level, LevelFilter};

use crate::config::logger_config::LoggerConfig;
use crate::interface::HostPrinter;

/// Log targets that `app_level_filter` applies to.
const APP_TARGETS: [&str; 3] = ["gdscaffold", "gdscaffold_core", "gdscaffold_sys"];

pub struct Logger;

impl Logger {
    /// Installs the process-wide `log` backend built by [`Logger::dispatch`].
    ///
    /// Returns `false` when a backend was already installed (the host loaded
    /// the library before, or another extension in the process owns `log`).
    pub fn init_logging(
        extension_name: &str,
        config: LoggerConfig,
        host: Option<HostPrinter>,
    ) -> bool {
        Self::dispatch(extension_name, config.with_env_override(), host).apply().is_ok()
    }

    /// Records go to stderr; warnings and errors are also handed to the host
    /// so they show up in the engine's output panel.
    pub fn dispatch(
        extension_name: &str,
        config: LoggerConfig,
        host: Option<HostPrinter>,
    ) -> fern::Dispatch {
        let colors = ColoredLevelConfig::new()
            .error(Color::Red)
            .warn(Color::Yellow)
            .info(Color::Green)
            .debug(Color::Cyan)
            .trace(Color::BrightBlack);

        let prefix = extension_name.to_string();
        let stderr = fern::Dispatch::new()
            .format(move |out, message, record| {
                out.finish(format_args!(
                    "[{} {} {} {}] {}",
                    chrono::Local::now().format("%H:%M:%S%.3f"),
                    prefix,
                    colors.color(record.level()),
                    record.target(),
                    message
                ))
            })
            .chain(std::io::stderr());

        let mut dispatch = fern::Dispatch::new().level(config.level_filter);
        for target in APP_TARGETS {
            dispatch = dispatch.level_for(target, config.app_level_filter);
        }
        dispatch = dispatch.chain(stderr);

        if let Some(printer) = host {
            dispatch = dispatch.chain(Self::host_chain(printer));
        }
        dispatch
    }

    fn host_chain(printer: HostPrinter) -> fern::Dispatch {
        let output = fern::Output::call(move |record| {
            let message = record.args().to_string();
            let function = record.module_path().unwrap_or_default();
            let file = record.file().unwrap_or_default();
            let line = record.line().unwrap_or_default();
            match record.level() {
                Level::Error => printer.error(&message, function, file, line),
                _ => printer.warning(&message, function, file, line),
            }
        });
        fern::Dispatch::new().level(LevelFilter::Warn).chain(output)
    }
}
