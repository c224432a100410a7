use std::fmt;

#[derive(Debug, PartialEq)]
pub enum TensorError {
    ShapeOverflow,
    ShapeMismatch { expected: usize, got: usize },
    /// Tensor is not laid out as `[C, H, W]` (optionally `[1, C, H, W]`).
    NotPlanar { shape: Vec<usize> },
}

impl fmt::Display for TensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TensorError::ShapeOverflow => write!(f, "shape dimensions overflow when multiplied"),
            TensorError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected} elements, got {got}")
            }
            TensorError::NotPlanar { shape } => {
                write!(f, "expected [C, H, W] or [1, C, H, W] tensor, got shape {shape:?}")
            }
        }
    }
}

impl std::error::Error for TensorError {}

fn element_count(shape: &[usize]) -> Result<usize, TensorError> {
    shape.iter().try_fold(1usize, |product, &dim| {
        product.checked_mul(dim).ok_or(TensorError::ShapeOverflow)
    })
}

/// Dense row-major tensor.
#[derive(Clone, PartialEq)]
pub struct Tensor<T> {
    pub shape: Vec<usize>,
    pub data: Vec<T>,
}

impl<T: fmt::Debug> fmt::Debug for Tensor<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tensor")
            .field("shape", &self.shape)
            .field("data", &self.data)
            .finish()
    }
}

impl<T> Tensor<T> {
    pub fn new(shape: Vec<usize>, data: Vec<T>) -> Result<Self, TensorError> {
        let product = element_count(&shape)?;
        if product != data.len() {
            return Err(TensorError::ShapeMismatch {
                expected: product,
                got: data.len(),
            });
        }

        Ok(Self { shape, data })
    }

    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Interpret the tensor as a stack of planes and return `(channels, height, width)`.
    ///
    /// A leading batch dimension of one is accepted and ignored.
    pub fn planes(&self) -> Result<(usize, usize, usize), TensorError> {
        match self.shape.as_slice() {
            &[c, h, w] | &[1, c, h, w] => Ok((c, h, w)),
            _ => Err(TensorError::NotPlanar {
                shape: self.shape.clone(),
            }),
        }
    }

    /// Borrow channel `c` of a planar tensor as a row-major `H * W` slice.
    ///
    /// Panics if the tensor is not planar or `c` is out of range.
    pub fn plane(&self, c: usize) -> &[T] {
        let (channels, h, w) = self
            .planes()
            .unwrap_or_else(|e| panic!("plane({c}) on non-planar tensor: {e}"));
        assert!(c < channels, "channel {c} out of range ({channels} channels)");
        let size = h * w;
        &self.data[c * size..(c + 1) * size]
    }
}

impl<T: Default + Clone> Tensor<T> {
    pub fn zeros(shape: Vec<usize>) -> Result<Self, TensorError> {
        let product = element_count(&shape)?;
        Ok(Self {
            shape,
            data: vec![T::default(); product],
        })
    }
}
