use crate::PoseError;
use candle_core::DType;
use paf_base::Tensor;

/// Copy a candle tensor into a host `Tensor<f32>` with the same shape.
///
/// Any dtype candle can cast to `f32` is accepted; tensors on other devices
/// are copied to the host.
pub fn tensor_from_candle(tensor: &candle_core::Tensor) -> Result<Tensor<f32>, PoseError> {
    let shape = tensor.dims().to_vec();
    let data = tensor
        .to_dtype(DType::F32)?
        .flatten_all()?
        .to_vec1::<f32>()?;
    Ok(Tensor::new(shape, data)?)
}
