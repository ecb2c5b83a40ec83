pub use linkshelf_api::Category;

/// Options offered by the category picker, in display order.
pub const CATEGORY_OPTIONS: [Category; 8] = Category::ALL;

/// Surface-independent category color. The TUI and the CLI each map it onto
/// their own palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryColor {
    Blue,
    Green,
    Yellow,
    Indigo,
    Red,
    Pink,
    Purple,
    Gray,
    /// Anything that is not one of the fixed labels
    Fallback,
}

/// The category a fresh draft starts with (the last option).
pub fn default_category() -> Category {
    CATEGORY_OPTIONS[CATEGORY_OPTIONS.len() - 1]
}

pub fn color_for(category: Category) -> CategoryColor {
    match category {
        Category::Programming => CategoryColor::Blue,
        Category::Networking => CategoryColor::Green,
        Category::Technology => CategoryColor::Yellow,
        Category::Finance => CategoryColor::Indigo,
        Category::Sports => CategoryColor::Red,
        Category::Music => CategoryColor::Pink,
        Category::Education => CategoryColor::Purple,
        Category::Other => CategoryColor::Gray,
    }
}

/// Color for a raw label. Only exact wire labels get a category color.
pub fn color_for_label(label: &str) -> CategoryColor {
    CATEGORY_OPTIONS
        .iter()
        .find(|c| c.as_str() == label)
        .map(|c| color_for(*c))
        .unwrap_or(CategoryColor::Fallback)
}
