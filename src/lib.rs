// chemistry module
pub mod chemistry {
    pub mod adduct;
    pub mod constants;
    pub mod elements;
    pub mod formula;
}

// algorithm module
pub mod algorithm {
    pub mod bounds;
    pub mod enumerate;
    pub mod isotope;
    pub mod scoring;
    pub mod search;
    pub mod validity;
}

// data module
pub mod data {
    pub mod candidate;
    pub mod collector;
    pub mod configuration;
    pub mod existence;
    pub mod spectrum;
}
