//! Summation primitive.
//!
//! Every statistic the fitters need (`Σx`, `Σx²`, `Σxy`, `Σ ln x`, ...) is a sum
//! over the sample, optionally after mapping each element. Elements may be
//! scalars or `(x, y)` pairs; the transform receives whatever the iterator
//! yields.
//!
//! Sums are a sequential left fold in input order, so repeated calls on the
//! same input are bit-identical.

/// Sum the elements directly.
pub fn sum<I>(elements: I) -> f64
where
    I: IntoIterator<Item = f64>,
{
    elements.into_iter().fold(0.0, |acc, v| acc + v)
}

/// Sum `transform(e)` over all elements.
pub fn sum_by<I, F>(elements: I, transform: F) -> f64
where
    I: IntoIterator,
    F: FnMut(I::Item) -> f64,
{
    sum(elements.into_iter().map(transform))
}
