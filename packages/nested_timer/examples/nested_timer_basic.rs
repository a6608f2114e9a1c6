//! Measures a small nested workload and prints the per-event lines and the summary block.
//!
//! Run with: `cargo run --example nested_timer_basic`.

use std::hint::black_box;

use nested_timer::Timer;

fn xor(data: &[u8]) -> u8 {
    data.iter().fold(0, |acc, b| acc ^ b)
}

fn main() {
    let timer = Timer::new();

    let data: Vec<u8> = (0..=255_u8).cycle().take(16 * 1024 * 1024).collect();

    for _ in 0..5 {
        let checksum = timer
            .measure("XOR", || xor(black_box(&data)))
            .expect("XOR is the only open event");
        black_box(checksum);
    }

    {
        let _total = timer.span("XOR_TOTAL");

        let copy = timer
            .measure("COPY", || data.clone())
            .expect("COPY is the innermost open event");

        let checksum = timer
            .measure("XOR", || xor(black_box(&copy)))
            .expect("XOR is the innermost open event");
        black_box(checksum);
    }

    timer
        .print_summaries()
        .expect("all events were stopped before printing");
}
