//! Counting stub for exercising the generator locally: always answers 200
//! for both endpoints and prints the received request rate once per second.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};
use std::{env, io};

use actix_web::{web, App, HttpResponse, HttpServer, Responder};
use tokio::time;

use gridload::request::PriceUpdate;

static DEFAULT_ADDR: &str = "127.0.0.1:8080";
static POSTS: AtomicUsize = AtomicUsize::new(0);
static GETS: AtomicUsize = AtomicUsize::new(0);

async fn price_updates(updates: web::Json<Vec<PriceUpdate>>) -> impl Responder {
    POSTS.fetch_add(1, Ordering::SeqCst);
    log::debug!("received {} price updates", updates.len());
    HttpResponse::Ok().finish()
}

async fn active_alerts() -> impl Responder {
    GETS.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().json(serde_json::json!([]))
}

async fn do_main(addr: &str) -> io::Result<()> {
    let ticker = async {
        let mut total = 0usize;
        let mut instant = Instant::now();
        let mut interval = time::interval(Duration::from_secs(1));
        loop {
            interval.tick().await;
            let posts = POSTS.swap(0, Ordering::SeqCst);
            let gets = GETS.swap(0, Ordering::SeqCst);
            total += posts + gets;
            let rate = (posts + gets) as f64 / (instant.elapsed().as_millis() + 1) as f64 * 1000.0;
            instant = Instant::now();
            println!(
                "rate: {:.3}/s (posts={}, gets={}, total={})",
                rate, posts, gets, total
            );
        }
    };

    let server = HttpServer::new(|| {
        App::new()
            .route("/price-updates", web::post().to(price_updates))
            .route("/active-alerts", web::get().to(active_alerts))
    })
    .bind(addr)?
    .run();

    tokio::select! {
        _ = ticker => {
            println!("ticker finished");
        }
        result = server => {
            println!("server finished");
            return result;
        }
    }
    Ok(())
}

#[actix_web::main]
async fn main() -> io::Result<()> {
    env_logger::init();

    let args = env::args().collect::<Vec<_>>();
    let addr = args.get(1).map(String::as_str).unwrap_or(DEFAULT_ADDR);

    println!("listening on {}", addr);
    do_main(addr).await
}
