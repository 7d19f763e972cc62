//! Category seed keywords for the keyword-suggestion path. High-level terms
//! the vendor expands into related-keyword suggestions.

use draftline_common::types::Category;

pub fn seed_keywords(category: Category) -> &'static [&'static str] {
    match category {
        Category::IndustryAnalysis => &[
            "corporate distress signals",
            "company liquidation trends",
            "business closure rates",
            "corporate bankruptcy statistics",
            "mass layoff trends",
            "corporate restructuring trends",
        ],
        Category::AssetRecovery => &[
            "distressed asset recovery",
            "corporate asset liquidation",
            "surplus equipment buyers",
            "business asset auction",
            "commercial equipment salvage",
            "decommissioned assets",
        ],
        Category::BankruptcyGuide => &[
            "chapter 7 bankruptcy assets",
            "chapter 11 restructuring",
            "bankruptcy asset sale",
            "363 sale bankruptcy",
            "bankruptcy trustee assets",
            "bankruptcy auction process",
        ],
        Category::WarnAct => &[
            "WARN Act filings",
            "WARN Act notice",
            "plant closing notification",
            "mass layoff notice",
            "60 day layoff notice",
            "state WARN Act laws",
        ],
        Category::DueDiligence => &[
            "distressed asset due diligence",
            "asset valuation distressed",
            "equipment appraisal liquidation",
            "distressed acquisition risks",
            "deal evaluation framework",
            "fair market value distressed assets",
        ],
        Category::LiquidationStrategy => &[
            "corporate liquidation strategy",
            "asset liquidation timeline",
            "orderly liquidation value",
            "forced liquidation value",
            "bulk asset sales strategy",
            "going concern vs liquidation",
        ],
        Category::EquipmentRemarketing => &[
            "equipment remarketing",
            "used corporate equipment",
            "IT asset disposition",
            "industrial equipment remarketing",
            "data center decommission",
            "heavy equipment resale value",
        ],
        Category::DistressedInvesting => &[
            "distressed debt investing",
            "distressed asset investment",
            "special situations investing",
            "distressed PE opportunities",
            "non-performing loan acquisition",
            "corporate turnaround investing",
        ],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_category_has_seeds() {
        for cat in Category::ALL {
            assert!(!seed_keywords(cat).is_empty(), "{cat} has no seeds");
        }
    }
}
