pub mod broadphase;
pub mod dispatch;
pub mod narrowphase;
pub mod shapes;
