use alloc::string::String;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt::Write;

std::thread_local! {
    static TYPE_STACK: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
}

/// Keeps a type path on the thread's conversion stack while alive.
pub(crate) struct Frame;

impl Frame {
    pub(crate) fn push(type_path: &'static str) -> Self {
        TYPE_STACK.with_borrow_mut(|stack| stack.push(type_path));
        Frame
    }
}

impl Drop for Frame {
    fn drop(&mut self) {
        let _ = TYPE_STACK.try_with(|stack| stack.borrow_mut().pop());
    }
}

/// The current stack, outermost type first.
pub(crate) fn snapshot() -> String {
    TYPE_STACK.with_borrow(|stack| {
        let mut out = String::new();
        let mut iter = stack.iter();
        if let Some(first) = iter.next() {
            let _ = writeln!(out, "`{first}`");
        }
        for path in iter {
            let _ = writeln!(out, " -> `{path}`");
        }
        out
    })
}
