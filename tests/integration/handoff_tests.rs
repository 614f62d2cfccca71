//! Hand-off buffer under a real concurrent producer.

use std::sync::Arc;
use std::thread;

use smartgarden::app::commands::Command;
use smartgarden::handoff::HandoffBuffer;

use crate::mock_ports::reading;

#[test]
fn concurrent_producer_loses_nothing_and_keeps_order() {
    const N: usize = 5_000;
    let buffer = Arc::new(HandoffBuffer::default());

    let producer = {
        let buffer = Arc::clone(&buffer);
        thread::spawn(move || {
            for i in 0..N {
                buffer.push(reading(i as f32, 50.0, 50.0, i % 2 == 0));
                if i % 1000 == 0 {
                    buffer.set_control(Command::ALL[i / 1000 % 3]);
                }
            }
        })
    };

    let mut received = Vec::with_capacity(N);
    while received.len() < N {
        received.extend(buffer.drain());
        let _ = buffer.read_control();
        thread::yield_now();
    }
    producer.join().unwrap();

    assert_eq!(received.len(), N);
    for (i, r) in received.iter().enumerate() {
        assert_eq!(r.temperature(), i as f32);
    }
    assert!(buffer.drain().is_empty());
}
