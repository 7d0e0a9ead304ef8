use futures_racer::{from_fn, race, BoxRacer, CancellationToken, Options};

use std::error::Error;
use std::io;
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{lookup_host, TcpStream};
use tokio::time::sleep;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut socket = open_tcp_socket("rust-lang.org", 80, Duration::from_millis(250)).await?;
    socket.write_all(b"GET / \r\n").await?;
    let mut res = String::new();
    socket.read_to_string(&mut res).await?;
    println!("{res}");
    Ok(())
}

/// Happy eyeballs algorithm!
///
/// 1. Resolve every address for the host
/// 2. Create one racer per address, each starting `stagger` after the last
/// 3. A racer that cannot connect is disqualified, the others keep going
/// 4. The first connection wins; the rest see the token and give up
/// 5. Stop everything after a timeout, or when the user presses Ctrl-C
async fn open_tcp_socket(
    host: &str,
    port: u16,
    stagger: Duration,
) -> Result<TcpStream, Box<dyn Error + Send + Sync + 'static>> {
    let addrs: Vec<_> = lookup_host((host, port)).await?.collect();
    let attempts = addrs.len() as u32;

    let racers: Vec<BoxRacer<TcpStream, io::Error>> = addrs
        .into_iter()
        .enumerate()
        .map(|(attempt, addr)| {
            let delay = stagger * attempt as u32;
            from_fn(move |token| async move {
                tokio::select! {
                    _ = token.cancelled() => Err(io::Error::from(io::ErrorKind::Interrupted)),
                    res = async {
                        sleep(delay).await;
                        TcpStream::connect(addr).await
                    } => res,
                }
            })
        })
        .collect();

    let kill = CancellationToken::new();
    let switch = kill.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            switch.cancel();
        }
    });

    let options = Options::new()
        .with_timeout(stagger * attempts + Duration::from_secs(3))
        .with_kill(kill);
    Ok(race(options, racers).await?)
}
