pub mod normalize;
pub mod rules;
pub mod selector_sort;
