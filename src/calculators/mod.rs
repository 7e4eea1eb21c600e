pub mod amortization;
pub mod contribution;

pub use amortization::AmortizationCalculator;
pub use contribution::ContributionCalculator;
