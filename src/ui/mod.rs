pub mod choropleth;
pub mod panels;
pub mod plot;
