//! Allocation behaviour of `analyze`, observed through a counting allocator.
//!
//! Only allocations made on a thread that switched tracking on are counted
//! or refused, so the test harness itself is unaffected.

use std::alloc::{GlobalAlloc, Layout, System};
use std::cell::Cell;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use epicycle_core::analysis::{analyze, AnalysisError};
use epicycle_core::shapes;

struct CountingAllocator;

static ALLOCATIONS: AtomicUsize = AtomicUsize::new(0);
static SIZE_LIMIT: AtomicUsize = AtomicUsize::new(usize::MAX);
static SERIAL: Mutex<()> = Mutex::new(());

thread_local! {
    static TRACKING: Cell<bool> = const { Cell::new(false) };
}

unsafe impl GlobalAlloc for CountingAllocator {
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if TRACKING.with(Cell::get) {
            if layout.size() > SIZE_LIMIT.load(Ordering::SeqCst) {
                return std::ptr::null_mut();
            }
            ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        }
        unsafe { System.alloc(layout) }
    }

    unsafe fn dealloc(&self, ptr: *mut u8, layout: Layout) {
        unsafe { System.dealloc(ptr, layout) }
    }

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        if TRACKING.with(Cell::get) {
            if new_size > SIZE_LIMIT.load(Ordering::SeqCst) {
                return std::ptr::null_mut();
            }
            ALLOCATIONS.fetch_add(1, Ordering::SeqCst);
        }
        unsafe { System.realloc(ptr, layout, new_size) }
    }
}

#[global_allocator]
static GLOBAL: CountingAllocator = CountingAllocator;

/// Runs `f` with tracking on and returns its output plus the allocation count.
fn tracked<T>(limit: usize, f: impl FnOnce() -> T) -> (T, usize) {
    ALLOCATIONS.store(0, Ordering::SeqCst);
    SIZE_LIMIT.store(limit, Ordering::SeqCst);
    TRACKING.with(|t| t.set(true));
    let out = f();
    TRACKING.with(|t| t.set(false));
    SIZE_LIMIT.store(usize::MAX, Ordering::SeqCst);
    (out, ALLOCATIONS.load(Ordering::SeqCst))
}

#[test]
fn analyze_allocates_only_its_three_reservations() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    for n in [64usize, 3000, 4096] {
        let points = shapes::square(n, 4.0);
        let (result, allocations) = tracked(usize::MAX, || analyze(&points, 4));
        assert_eq!(result.unwrap().len(), 4);
        // spectrum, all coefficients, kept coefficients
        assert_eq!(allocations, 3, "n = {n}");
    }
}

#[test]
fn refused_memory_is_reported_not_aborted() {
    let _guard = SERIAL.lock().unwrap_or_else(|e| e.into_inner());
    let points = shapes::circle(4096, 1.0);
    let (result, _) = tracked(1024, || analyze(&points, 8));
    assert_eq!(result, Err(AnalysisError::Allocation { points: 4096 }));

    // Spectrum fits, the coefficient table does not.
    let (result, _) = tracked(4096 * 24 - 1, || analyze(&points, 8));
    assert_eq!(result, Err(AnalysisError::Allocation { points: 4096 }));

    let (result, _) = tracked(4096 * 24, || analyze(&points, 8));
    assert_eq!(result.map(|r| r.len()), Ok(8));
}
