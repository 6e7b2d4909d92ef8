//! Product variants: the shopper-side option display and the admin-side
//! variant table.

use std::collections::HashMap;

use wyndo_core::{WyndoError, WyndoResult};

// ── Shopper side ─────────────────────────────────────────────────────

/// Stock level shown by the gauge under a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockLevel {
    Danger,
    Warning,
    Success,
}

impl StockLevel {
    /// Level for a stock count: none, exactly one, or more.
    pub fn for_stock(stock: f64) -> Self {
        if stock < 1.0 {
            Self::Danger
        } else if stock <= 1.0 {
            Self::Warning
        } else {
            Self::Success
        }
    }

    /// Gauge fill, in percent.
    pub const fn gauge_value(self) -> u8 {
        match self {
            Self::Danger => 33,
            Self::Warning => 66,
            Self::Success => 100,
        }
    }

    pub const fn css_class(self) -> &'static str {
        match self {
            Self::Danger => "progress-bar-danger",
            Self::Warning => "progress-bar-warning",
            Self::Success => "progress-bar-success",
        }
    }
}

/// A selectable variant, read from the `data-*` attributes of its option.
#[derive(Debug, Clone, PartialEq)]
pub struct VariantOption {
    pub price: String,
    pub name: String,
    pub stock: f64,
    pub description: String,
}

impl VariantOption {
    /// Reads `data-price`, `data-name`, `data-stock` and `data-description`.
    /// Price, name and stock are required; the description may be absent.
    pub fn from_data_attributes(attrs: &HashMap<String, String>) -> WyndoResult<Self> {
        let get = |key: &str| {
            attrs
                .get(key)
                .cloned()
                .ok_or_else(|| WyndoError::ConfigurationError(format!("missing `{key}` attribute")))
        };
        let raw_stock = get("data-stock")?;
        let stock = raw_stock.trim().parse::<f64>().map_err(|_| {
            WyndoError::ConfigurationError(format!("invalid `data-stock` attribute: {raw_stock:?}"))
        })?;
        Ok(Self {
            price: get("data-price")?,
            name: get("data-name")?,
            stock,
            description: attrs.get("data-description").cloned().unwrap_or_default(),
        })
    }

    /// What the product panel shows once this variant is selected.
    pub fn display(&self) -> VariantDisplay {
        VariantDisplay {
            price_label: format!("${}", self.price),
            name: self.name.clone(),
            description: self.description.clone(),
            stock: StockLevel::for_stock(self.stock),
        }
    }
}

/// Price, name, description and stock gauge of the selected variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantDisplay {
    pub price_label: String,
    pub name: String,
    pub description: String,
    pub stock: StockLevel,
}

// ── Admin side ───────────────────────────────────────────────────────

/// An image link in the admin variant table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLink {
    pub image_id: String,
    pub label: String,
}

/// One variant row and its images.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantRow {
    pub name: String,
    pub images: Vec<ImageLink>,
}

impl VariantRow {
    pub fn new<I, S>(name: impl Into<String>, image_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut row = Self {
            name: name.into(),
            images: image_ids
                .into_iter()
                .map(|id| ImageLink {
                    image_id: id.into(),
                    label: String::new(),
                })
                .collect(),
        };
        row.relabel();
        row
    }

    /// Renumbers the image links `View image #1..N`.
    pub fn relabel(&mut self) {
        for (i, link) in self.images.iter_mut().enumerate() {
            link.label = format!("View image #{}", i + 1);
        }
    }

    pub fn labels(&self) -> Vec<&str> {
        self.images.iter().map(|l| l.label.as_str()).collect()
    }
}

/// The admin product editor: product name plus the variant table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VariantTable {
    pub product_name: String,
    pub rows: Vec<VariantRow>,
}

impl VariantTable {
    pub fn new(product_name: impl Into<String>, rows: Vec<VariantRow>) -> Self {
        Self {
            product_name: product_name.into(),
            rows,
        }
    }

    /// Heading of the table section.
    pub fn title(&self) -> &'static str {
        if self.rows.len() <= 1 {
            "Product Detail"
        } else {
            "Variations"
        }
    }

    /// Removes the image from whichever row holds it and renumbers that
    /// row's links. Returns `false` if no row holds the image.
    pub fn remove_image(&mut self, image_id: &str) -> bool {
        for row in &mut self.rows {
            if let Some(pos) = row.images.iter().position(|l| l.image_id == image_id) {
                row.images.remove(pos);
                row.relabel();
                return true;
            }
        }
        false
    }

    /// Sets the product name. A product with a single variant keeps the
    /// variant's name in step.
    pub fn set_product_name(&mut self, name: &str) {
        self.product_name = name.to_string();
        if let [only] = self.rows.as_mut_slice() {
            only.name = name.to_string();
        }
    }

    /// Sets the first variant's name, mirrored onto the product name while
    /// it is the only variant.
    pub fn set_variant_name(&mut self, name: &str) {
        if let Some(first) = self.rows.first_mut() {
            first.name = name.to_string();
        }
        if self.rows.len() == 1 {
            self.product_name = name.to_string();
        }
    }
}
