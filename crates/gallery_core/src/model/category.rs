//! Category entity and its DTOs.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type CategoryId = i64;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub category_id: CategoryId,
    pub name: String,
    pub date_created: NaiveDate,
    pub row_version: i64,
}

impl Category {
    pub fn with_update(&self, request: &UpdateCategoryDto) -> Self {
        Self {
            category_id: self.category_id,
            name: request.c_name.clone(),
            date_created: request.date_created,
            row_version: self.row_version,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
    pub date_created: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddCategoryDto {
    pub c_name: String,
    pub date_created: NaiveDate,
}

impl From<&AddCategoryDto> for NewCategory {
    fn from(value: &AddCategoryDto) -> Self {
        Self {
            name: value.c_name.clone(),
            date_created: value.date_created,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateCategoryDto {
    pub category_id: CategoryId,
    pub c_name: String,
    pub date_created: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDto {
    pub category_id: CategoryId,
    pub c_name: String,
    pub date_created: NaiveDate,
    pub total_artworks: usize,
    pub artworks_title: Vec<String>,
}

impl CategoryDto {
    pub fn project(category: Category, artworks_title: Vec<String>) -> Self {
        Self {
            category_id: category.category_id,
            c_name: category.name,
            date_created: category.date_created,
            total_artworks: artworks_title.len(),
            artworks_title,
        }
    }
}
