//! Static, pre-curated image pool: the tier-2 backfill when the photo
//! service comes up short, and the final backstop behind it.

use std::collections::HashSet;

use draftline_common::types::{BlogImage, Category};

pub struct CuratedImage {
    pub url: &'static str,
    pub alt: &'static str,
    pub themes: &'static [&'static str],
}

const CREDIT: &str = "Unsplash";

pub const CURATED_POOL: &[CuratedImage] = &[
    CuratedImage {
        url: "https://images.unsplash.com/photo-1497366216548-37526070297c?w=1200&q=80",
        alt: "Empty corporate office space",
        themes: &["corporate-distress", "office-equipment"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1486406146926-c627a92ad1ab?w=1200&q=80",
        alt: "Corporate skyscraper exterior",
        themes: &["corporate-distress", "distressed-investing"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1565793298595-6a879b1d9492?w=1200&q=80",
        alt: "Industrial warehouse interior",
        themes: &["factory-warehouse", "equipment-remarketing"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1586528116311-ad8dd3c8310d?w=1200&q=80",
        alt: "Warehouse with stacked inventory",
        themes: &["factory-warehouse", "asset-recovery"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1581091226825-a6a2a5aee158?w=1200&q=80",
        alt: "Industrial machinery close-up",
        themes: &["factory-warehouse", "equipment-remarketing"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1589829545856-d10d557cf95f?w=1200&q=80",
        alt: "Courthouse pillars and scales of justice",
        themes: &["legal-courthouse", "bankruptcy-guide"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1436450412740-6b988f486c6b?w=1200&q=80",
        alt: "Legal documents and gavel",
        themes: &["legal-courthouse", "bankruptcy-guide"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1450101499163-c8848c66ca85?w=1200&q=80",
        alt: "Contract signing on wooden desk",
        themes: &["legal-courthouse", "due-diligence"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1551288049-bebda4e38f71?w=1200&q=80",
        alt: "Data analytics dashboard on screen",
        themes: &["data-analytics", "industry-analysis"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1460925895917-afdab827c52f?w=1200&q=80",
        alt: "Financial charts and market data",
        themes: &["data-analytics", "distressed-investing"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1518455027359-f3f8164ba6bd?w=1200&q=80",
        alt: "Server room with network equipment",
        themes: &["office-equipment", "equipment-remarketing"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1573164713988-8665fc963095?w=1200&q=80",
        alt: "Business professionals in strategy meeting",
        themes: &["business-meeting", "due-diligence"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1552664730-d307ca884978?w=1200&q=80",
        alt: "Team analyzing business documents",
        themes: &["business-meeting", "liquidation-strategy"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1533073526757-2c8ca1df9f1c?w=1200&q=80",
        alt: "Auction house interior",
        themes: &["liquidation-strategy", "asset-recovery"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1559136555-9303baea8ebd?w=1200&q=80",
        alt: "American flag at government building",
        themes: &["legal-courthouse", "warn-act"],
    },
    CuratedImage {
        url: "https://images.unsplash.com/photo-1434626881859-194d67b2b86f?w=1200&q=80",
        alt: "Declining financial graph",
        themes: &["data-analytics", "corporate-distress"],
    },
];

/// Hard-coded last resort. A slot is never left empty.
pub fn default_image() -> BlogImage {
    BlogImage {
        url: "https://images.unsplash.com/photo-1497366216548-37526070297c?w=1200&q=80".to_string(),
        alt: "Empty corporate office space".to_string(),
        credit: CREDIT.to_string(),
    }
}

/// Visual themes associated with each category, most characteristic first.
pub fn category_themes(category: Category) -> &'static [&'static str] {
    match category {
        Category::IndustryAnalysis => &["data-analytics", "corporate-distress", "industry-analysis"],
        Category::AssetRecovery => &["factory-warehouse", "asset-recovery", "office-equipment"],
        Category::BankruptcyGuide => &["legal-courthouse", "bankruptcy-guide", "corporate-distress"],
        Category::WarnAct => &["warn-act", "legal-courthouse", "corporate-distress"],
        Category::DueDiligence => &["due-diligence", "business-meeting", "data-analytics"],
        Category::LiquidationStrategy => &["liquidation-strategy", "factory-warehouse", "business-meeting"],
        Category::EquipmentRemarketing => &["equipment-remarketing", "factory-warehouse", "office-equipment"],
        Category::DistressedInvesting => &["distressed-investing", "data-analytics", "business-meeting"],
    }
}

/// Top pool images for a category by theme overlap, skipping already-used
/// URLs. Stable ordering: equal scores keep pool order.
pub fn curated_for_category(
    category: Category,
    count: usize,
    used: &HashSet<String>,
) -> Vec<BlogImage> {
    let themes = category_themes(category);

    let mut scored: Vec<(usize, &CuratedImage)> = CURATED_POOL
        .iter()
        .filter(|img| !used.contains(img.url))
        .map(|img| {
            let overlap = img.themes.iter().filter(|t| themes.contains(t)).count();
            (overlap, img)
        })
        .collect();
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(count)
        .map(|(_, img)| BlogImage {
            url: img.url.to_string(),
            alt: img.alt.to_string(),
            credit: CREDIT.to_string(),
        })
        .collect()
}
