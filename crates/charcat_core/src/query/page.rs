//! Pagination and sort contract.
//!
//! # Invariants
//! - Sort fields are a closed set; unknown names fail fast.
//! - Unrecognized sort directions fall back to ascending.
//! - Every ordering ends with `id ASC` so page boundaries are stable.

use crate::model::character::Stat;
use crate::query::QueryError;

/// Page size used by plain listing when the caller supplies none.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
/// Page size used by search when the caller supplies none.
pub const DEFAULT_SEARCH_PAGE_SIZE: u32 = 12;
/// Upper bound for page sizes; larger requests are clamped.
pub const MAX_PAGE_SIZE: u32 = 100;
pub const DEFAULT_SORT_FIELD: &str = "id";
pub const DEFAULT_SORT_DIRECTION: &str = "asc";

/// Attribute a page can be ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    Id,
    Name,
    Description,
    Type,
    Classification,
    SpritePath,
    Stat(Stat),
    CreatedAt,
    UpdatedAt,
}

impl SortField {
    /// Parses an attribute name in camelCase or snake_case.
    ///
    /// # Errors
    /// - [`QueryError::UnknownSortField`] for anything that is not a character
    ///   attribute. `isDeleted` is not sortable.
    pub fn parse(value: &str) -> Result<Self, QueryError> {
        let normalized: String = value
            .trim()
            .chars()
            .filter(|ch| *ch != '_')
            .map(|ch| ch.to_ascii_lowercase())
            .collect();

        let field = match normalized.as_str() {
            "id" => Self::Id,
            "name" => Self::Name,
            "description" => Self::Description,
            "type" => Self::Type,
            "classification" => Self::Classification,
            "spritepath" => Self::SpritePath,
            "createdat" => Self::CreatedAt,
            "updatedat" => Self::UpdatedAt,
            other => Stat::ALL
                .into_iter()
                .find(|stat| stat.field_name().eq_ignore_ascii_case(other))
                .map(Self::Stat)
                .ok_or_else(|| QueryError::UnknownSortField(value.to_string()))?,
        };
        Ok(field)
    }

    /// Column name in the `characters` table.
    pub fn column(self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::Name => "name",
            Self::Description => "description",
            Self::Type => "type",
            Self::Classification => "classification",
            Self::SpritePath => "sprite_path",
            Self::Stat(stat) => stat.column(),
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// `desc` (any case) is descending; every other value is ascending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            Self::Desc
        } else {
            Self::Asc
        }
    }

    pub fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Validated page/sort request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    size: u32,
    sort: SortField,
    direction: SortDirection,
}

impl PageRequest {
    /// Builds a request from raw caller values.
    ///
    /// # Errors
    /// - [`QueryError::InvalidPageSize`] when `size == 0`.
    /// - [`QueryError::UnknownSortField`] when `sort_by` is not an attribute.
    pub fn new(page: u32, size: u32, sort_by: &str, sort_dir: &str) -> Result<Self, QueryError> {
        if size == 0 {
            return Err(QueryError::InvalidPageSize(size));
        }

        Ok(Self {
            page,
            size: size.min(MAX_PAGE_SIZE),
            sort: SortField::parse(sort_by)?,
            direction: SortDirection::parse(sort_dir),
        })
    }

    /// First page of a plain listing: size 10, `id ASC`.
    pub fn listing() -> Self {
        Self::first_page(DEFAULT_PAGE_SIZE)
    }

    /// First page of a search: size 12, `id ASC`.
    pub fn search() -> Self {
        Self::first_page(DEFAULT_SEARCH_PAGE_SIZE)
    }

    fn first_page(size: u32) -> Self {
        Self {
            page: 0,
            size,
            sort: SortField::Id,
            direction: SortDirection::Asc,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn sort(&self) -> SortField {
        self.sort
    }

    pub fn direction(&self) -> SortDirection {
        self.direction
    }

    /// Number of matching rows skipped before this page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page) * u64::from(self.size)
    }

    /// `ORDER BY` body for this request, including the id tie-break.
    pub fn order_by_sql(&self) -> String {
        let column = self.sort.column();
        let direction = self.direction.as_sql();
        if self.sort == SortField::Id {
            format!("{column} {direction}")
        } else {
            format!("{column} {direction}, id ASC")
        }
    }
}
