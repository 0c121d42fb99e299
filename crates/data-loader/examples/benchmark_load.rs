use data_loader::Catalog;
use std::path::Path;
use std::time::Instant;

fn main() {
    let data_dir = Path::new("output");

    println!("Loading recommendation artifacts...\n");

    let start = Instant::now();
    let catalog = Catalog::load_from_dir(data_dir)
        .expect("Failed to load catalog");
    let elapsed = start.elapsed();

    let movies = catalog.len();
    let scores = movies * movies;

    println!("\n=== Load Complete ===");
    println!("Time taken: {:?}", elapsed);
    println!("Movies: {}", movies);
    println!("Similarity scores: {}", scores);
    println!("\nPerformance: {:.0} scores/second",
             scores as f64 / elapsed.as_secs_f64());
}
