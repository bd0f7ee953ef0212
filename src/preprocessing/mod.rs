//! Fitted preprocessing artifacts applied around the model.
//!
//! - Scalers run on the assembled feature row before prediction.
//! - The label decoder runs on the model output after prediction.
//!
//! Both are optional; the predictor skips whichever was not loaded.

pub mod error;
pub mod label;
pub mod scaling;
pub mod traits;

pub use error::PreprocessingError;
pub use label::{capitalize, LabelDecoder};
pub use scaling::{
    FittedScaler, MaxAbsScalerParams, MinMaxScalerConfig, MinMaxScalerParams, RobustScalerConfig,
    RobustScalerParams, ScalerParams, StandardScalerConfig, StandardScalerParams,
};
pub use traits::FittedTransformer;
