//! Helpers shared across the crate.
//!
//! - The process-wide rayon [`THREAD_POOL`] used for per-chromosome
//!   parallelism. Its size is read once from the `COMPARTMAP_NUM_THREADS`
//!   environment variable.
//! - Value transforms between the beta and M-value scales
//!   ([`flogit`], [`fexpit`]).
//! - Macros generating getters and builder-style `with_*` setters.

use once_cell::sync::Lazy;
use rayon::{
    ThreadPool,
    ThreadPoolBuilder,
};

mod transform;
pub use transform::*;

pub const NUM_THREADS_ENV: &str = "COMPARTMAP_NUM_THREADS";

pub static THREAD_POOL: Lazy<ThreadPool> = Lazy::new(|| {
    let num_threads: Option<usize> = std::env::var(NUM_THREADS_ENV)
        .ok()
        .and_then(|str| str.parse::<usize>().ok());
    ThreadPoolBuilder::new()
        .num_threads(num_threads.unwrap_or(0))
        .build()
        .expect("Failed to create thread pool")
});

pub fn n_threads() -> usize {
    THREAD_POOL.current_num_threads()
}

#[macro_export]
macro_rules! getter_fn {
    ($field_name: ident, $field_type: ty) => {
        #[cfg_attr(coverage_nightly, coverage(off))]
        pub fn $field_name(&self) -> &$field_type {
            &self.$field_name
        }
    };
}
pub use getter_fn;

#[macro_export]
macro_rules! with_field_fn {
    ($field_name: ident, $field_type: ty) => {
        paste::paste! {
            #[cfg_attr(coverage_nightly, coverage(off))]
            pub fn [<with_$field_name>](mut self, value: $field_type) -> Self {
                self.$field_name = value;
                self
            }
        }
    };
}
pub use with_field_fn;
