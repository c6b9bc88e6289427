pub mod error;

pub mod service {
    pub mod config_service;
    pub mod fingerprint;
    pub mod html;
    pub mod script;
    pub mod style;
    pub mod transform;
    pub mod traits {
        pub mod i_service;
    }
}

pub mod config {
    pub mod config;
    pub mod ports;
}

pub mod action {
    pub mod cli;
    pub mod fingerprint;
}

pub mod facade {
    pub mod pipeline_facade;
    pub mod traits {
        pub mod i_pipeline;
    }
}

pub mod models {
    pub mod fingerprint;
    pub mod html;
    pub mod path_map;
    pub mod pipeline;
}

pub mod utils {
    pub mod file;
    pub mod html;
    pub mod utils;
}
