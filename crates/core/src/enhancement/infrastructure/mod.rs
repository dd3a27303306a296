pub mod interpolation_upscaler;
pub mod onnx_super_resolution_upscaler;
pub mod upscaler_factory;
