//! Project-specific utilities live here.

/// Overwrite `target` when the update carries a value; absent leaves it untouched.
pub fn merge<T>(target: &mut T, update: Option<T>) {
    if let Some(value) = update {
        *target = value;
    }
}
