#![no_std]

const HEAP_SIZE: usize = 4 * 1024 * 1024;

#[global_allocator]
static ALLOCATOR: segalloc::Allocator<HEAP_SIZE> = segalloc::Allocator::new();

extern crate alloc;

#[test]
fn vec() {
    let mut v = alloc::vec![10, 20, 30];
    v.push(40);
    v.remove(0);

    assert_eq!(alloc::vec![20, 30, 40], v);
}

#[test]
fn map_and_formatting() {
    let mut map = alloc::collections::BTreeMap::new();
    map.insert("planet", "world");
    map.insert("greeting", "hello");

    let line = alloc::format!("{}, {}!", map["greeting"], map["planet"]);
    assert_eq!(line, "hello, world!");
}

#[test]
fn churn_keeps_the_heap_consistent() {
    let mut buffers = alloc::vec::Vec::new();
    for round in 0..64_usize {
        buffers.push(alloc::vec![round as u8; 16 + round * 8]);
        if round % 3 == 0 {
            buffers.swap_remove(round / 3 % buffers.len());
        }
    }
    drop(buffers);

    ALLOCATOR.check().unwrap();
}
