// ABOUTME: Employee directory entity with generated EMP-prefixed identifiers
// ABOUTME: Attendance rows reference employees by employee_id value only

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

pub const ID_PREFIX: &str = "EMP";
pub const DEFAULT_AVATAR: &str = "https://via.placeholder.com/150";

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub employee_id: String,
    pub name: String,
    pub title: String,
    pub email: String,
    pub department: String,
    pub location: String,
    pub avatar: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
