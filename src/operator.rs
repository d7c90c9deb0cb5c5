use std::io::BufRead;
use tokio::sync::mpsc;

pub const EXIT_COMMAND: &str = "exit";

/// Строки из stdin.
///
/// Читаются в отдельном потоке, который не держит рантайм при выходе:
/// блокирующее чтение stdin в tokio отменить нельзя.
pub fn stdin_lines() -> mpsc::UnboundedReceiver<String> {
    let (tx, rx) = mpsc::unbounded_channel();

    std::thread::spawn(move || {
        for line in std::io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        return;
                    }
                }
                Err(e) => {
                    log::error!("Failed to read console input: {}", e);
                    return;
                }
            }
        }
    });

    rx
}

/// Читает команды оператора, пока не придёт `exit`.
///
/// При закрытом вводе никогда не завершается: остаётся только Ctrl-C.
pub async fn wait_for_exit(mut lines: mpsc::UnboundedReceiver<String>) {
    while let Some(line) = lines.recv().await {
        let command = line.trim();
        if command.eq_ignore_ascii_case(EXIT_COMMAND) {
            log::info!("Exit requested from console");
            return;
        }
        println!("wrong command, type '{}' to stop the bot", EXIT_COMMAND);
        log::warn!("Unknown console command: {:?}", command);
    }

    log::info!("Console input closed, use Ctrl-C to stop");
    std::future::pending::<()>().await
}
