use std::env;
use std::error::Error;
use std::io::{self, Write};

use lobby_core::Input;
use lobby_protocol::parse_input_line;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Where to connect: env override or default.
    let addr = env::var("LOBBY_CLIENT_ADDR").unwrap_or_else(|_| "127.0.0.1:8080".to_string());

    println!("Connecting to {}...", addr);
    let stream = TcpStream::connect(&addr).await?;
    println!("Connected.");
    println!("Type commands like:");
    println!("  cast 1 2   (attack player 2)");
    println!("  cast 2     (heal)");
    println!("Type 'exit' to leave.\n");

    let (read_half, mut write_half) = stream.into_split();

    // Print everything the server sends as it arrives.
    let printer = tokio::spawn(async move {
        let mut lines = BufReader::new(read_half).lines();
        while let Ok(Some(line)) = lines.next_line().await {
            println!("<< {}", line);
        }
        println!("Server closed the connection.");
    });

    let stdin = io::stdin();

    loop {
        print!(">> ");
        io::stdout().flush()?;

        let mut line = String::new();
        let n = stdin.read_line(&mut line)?;
        if n == 0 {
            println!("\nEOF on stdin, exiting client.");
            break;
        }

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        // Warn locally about lines the server will silently ignore.
        let parsed = parse_input_line(trimmed);
        if parsed == Input::Unrecognized {
            eprintln!("Not a command the lobby understands; sending anyway.");
        }

        write_half.write_all(format!("{}\n", trimmed).as_bytes()).await?;

        if trimmed == "exit" {
            break;
        }
    }

    let _ = write_half.shutdown().await;
    let _ = printer.await;
    Ok(())
}
