//! # Linear algebra primitives
//!
//! The exact constraint matrix and the small helpers shared by the algorithms working on it.
pub mod matrix;

/// A sparse element: an index together with a value.
pub type SparseTuple<F> = (usize, F);

/// Inner product of a sparse vector with a dense one.
///
/// # Arguments
///
/// * `sparse`: Index-value tuples, indices within the length of `dense`.
/// * `dense`: Dense values.
pub fn sparse_dense_inner_product<'a, F>(
    sparse: impl IntoIterator<Item=(usize, &'a F)>,
    dense: &[F],
) -> F
where
    F: crate::data::number_types::traits::Field + 'a,
{
    sparse.into_iter()
        .filter(|&(i, _)| !dense[i].is_zero())
        .fold(F::zero(), |total, (i, value)| total + value.clone() * &dense[i])
}
