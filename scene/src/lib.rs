//! Procedural scene composition for synthetic detection datasets.
//!
//! Primitives declare ordered [`ParamSpace`]s, render themselves into
//! transparent canvas-sized layers, and a [`Sampler`] stacks them into one
//! image while keeping every primitive's layer as its annotation mask.

pub mod background;
pub mod composite;
pub mod error;
pub mod fonts;
pub mod lorem;
pub mod param;
pub mod photo;
pub mod primitive;
pub mod rectangle;
pub mod sampler;
pub mod text;

pub use background::Background;
pub use error::{SceneError, SceneResult};
pub use fonts::FontPool;
pub use param::{ParamSpace, Params, Resolver, Value};
pub use photo::Photo;
pub use primitive::{Annotation, Primitive, Rendered, Sample};
pub use rectangle::Rectangle;
pub use sampler::{Composition, MaskGroups, Sampler};
pub use text::Text;
