use crate::PaletteError;

/// Receives progress updates while a pack is generated.
///
/// All methods have empty default implementations,
/// and `()` can be used to ignore progress entirely.
pub trait Progress {
    /// Generation started and will report `total` steps.
    fn start(&mut self, _total: usize, _message: &str) {}

    /// The previous step finished and the step described by `message` started.
    fn step(&mut self, _message: &str) {}

    /// The palette or material for `item` was skipped because of `error`.
    fn skipped(&mut self, _item: &str, _error: &PaletteError) {}

    /// Generation finished.
    fn finish(&mut self, _message: &str) {}
}

impl Progress for () {}

impl<T: Progress + ?Sized> Progress for &mut T {
    fn start(&mut self, total: usize, message: &str) {
        (**self).start(total, message);
    }

    fn step(&mut self, message: &str) {
        (**self).step(message);
    }

    fn skipped(&mut self, item: &str, error: &PaletteError) {
        (**self).skipped(item, error);
    }

    fn finish(&mut self, message: &str) {
        (**self).finish(message);
    }
}
