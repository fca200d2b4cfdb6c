/// Routing side channel supplied by the host's router.
pub trait Navigator {
    /// The path currently being rendered.
    fn current_path(&self) -> String;

    /// Replace the current location with `target`.
    fn navigate(&self, target: &str);
}

impl<T: Navigator + ?Sized> Navigator for std::sync::Arc<T> {
    fn current_path(&self) -> String {
        (**self).current_path()
    }

    fn navigate(&self, target: &str) {
        (**self).navigate(target)
    }
}
