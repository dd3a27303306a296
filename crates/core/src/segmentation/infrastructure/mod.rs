pub mod onnx_selfie_segmenter;
