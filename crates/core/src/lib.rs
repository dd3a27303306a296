//! Biometric (passport-style) photo generation: face framing, person
//! matting and background compositing.

pub mod compositing {
    pub mod domain {
        pub mod background_color;
        pub mod compositor;
    }
}

pub mod detection {
    pub mod domain {
        pub mod face_detector;
        pub mod face_localizer;
    }
    pub mod infrastructure;
}

pub mod enhancement {
    pub mod domain {
        pub mod upscaler;
    }
    pub mod infrastructure;
}

pub mod framing {
    pub mod domain {
        pub mod framer;
    }
}

pub mod io {
    pub mod domain {
        pub mod image_reader;
        pub mod image_writer;
        pub mod output_path;
    }
    pub mod infrastructure;
}

pub mod matting {
    pub mod domain {
        pub mod matte_builder;
        pub mod matte_mode;
        pub mod matte_strategy;
    }
    pub mod infrastructure;
}

pub mod pipeline {
    pub mod biometric_photo_pipeline;
    pub mod config;
    pub mod generate_biometric_photo_use_case;
    pub mod pipeline_logger;
}

pub mod segmentation {
    pub mod domain {
        pub mod segmentation_model;
    }
    pub mod infrastructure;
}

pub mod shared {
    pub mod constants;
    pub mod crop_rect;
    pub mod error;
    pub mod face_box;
    pub mod mask;
    pub mod model_resolver;
    pub mod onnx_session;
    pub mod target_ratio;
}
