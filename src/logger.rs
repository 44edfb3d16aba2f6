use std::io::Write;

/// Логирование с временными метками.
///
/// Ставит env_logger как бэкенд для `log`; webrtc-rs пишет туда же.
/// Уровень берётся из `RUST_LOG`, по умолчанию `info`. Повторный вызов ничего не делает.
pub fn init() {
    // Проверяем конфигурацию логирования
    if !crate::config::LOGGING_ENABLED {
        return;
    }

    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "RUST: [{}] {} {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                record.level(),
                record.args()
            )
        })
        .try_init();
}
