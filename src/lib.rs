pub mod app;
pub mod background;
pub mod camera;
pub mod controls;
pub mod instance;
pub mod page;
pub mod pipeline;
pub mod sphere;
pub mod starfield;
pub mod system;
pub mod texture;
pub mod tour;
