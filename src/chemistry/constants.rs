// Purpose: To store constants that are used in the program
pub const MASS_PROTON: f64 = 1.007276466621; // Unified atomic mass unit
pub const MASS_NEUTRON: f64 = 1.00866491595; // Unified atomic mass unit
pub const MASS_ELECTRON: f64 = 0.00054857990946; // Unified atomic mass unit
pub const MASS_WATER: f64 = 18.0105646863; // Unified atomic mass unit

// Monoisotopic masses of the elements covered by the formula search
pub const MASS_C: f64 = 12.0;
pub const MASS_H: f64 = 1.00782503223;
pub const MASS_N: f64 = 14.00307400443;
pub const MASS_O: f64 = 15.99491461957;
pub const MASS_F: f64 = 18.99840316273;
pub const MASS_SI: f64 = 27.97692653465;
pub const MASS_P: f64 = 30.97376199842;
pub const MASS_S: f64 = 31.9720711744;
pub const MASS_CL: f64 = 34.968852682;
pub const MASS_BR: f64 = 78.9183376;
pub const MASS_I: f64 = 126.904473;

// Derivatization group contributions. Trimethylsilylation replaces an
// active hydrogen (net +C3H8Si), methoximation converts a carbonyl
// (net +CH3N).
pub const MASS_TMS_GROUP: f64 = 3.0 * MASS_C + 8.0 * MASS_H + MASS_SI;
pub const MASS_MEOX_GROUP: f64 = MASS_C + 3.0 * MASS_H + MASS_N;
