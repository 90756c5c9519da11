//! Step timing: serial vs rayon transition, for both topologies

use std::time::Instant;
use canvas_life::domain::{Grid, Topology};

fn benchmark_serial(size: usize, topology: Topology, iterations: u32) -> f64 {
    let mut grid = Grid::new(size, size, topology).expect("benchmark sizes are non-zero");

    let start = Instant::now();
    for _ in 0..iterations {
        grid = grid.next_generation();
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn benchmark_parallel(size: usize, topology: Topology, iterations: u32) -> f64 {
    let mut grid = Grid::new(size, size, topology).expect("benchmark sizes are non-zero");

    let start = Instant::now();
    for _ in 0..iterations {
        grid = grid.next_generation_parallel();
    }
    start.elapsed().as_secs_f64() * 1000.0 / iterations as f64
}

fn main() {
    println!("Game of Life step benchmark");
    println!("===========================\n");

    let sizes = [50, 100, 200, 500, 1000];

    for topology in [Topology::Periodic, Topology::Bounded] {
        println!("{} topology", topology.name());
        println!("{:>8} {:>12} {:>12} {:>9}", "size", "serial ms", "rayon ms", "speedup");

        for &size in &sizes {
            let iterations = if size >= 500 { 10 } else { 50 };
            let serial = benchmark_serial(size, topology, iterations);
            let parallel = benchmark_parallel(size, topology, iterations);
            println!(
                "{:>8} {:>12.3} {:>12.3} {:>8.1}x",
                format!("{size}x{size}"),
                serial,
                parallel,
                serial / parallel
            );
        }
        println!();
    }
}
