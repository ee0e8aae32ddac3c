use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    /// Business key, unique across live records.
    #[sea_orm(unique)]
    pub employee_number: String,

    pub employee_name: String,

    pub employee_dob: Date,

    pub employee_firstname: String,

    pub employee_lastname: String,

    pub employee_city: String,

    pub created_at: Option<DateTimeUtc>,

    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
