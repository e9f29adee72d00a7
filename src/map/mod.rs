mod layer;
mod region;

pub use layer::RegionLayer;
pub use region::Region;
