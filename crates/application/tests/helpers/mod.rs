mod mock_cost_source;

pub use mock_cost_source::*;
