use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "reports")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "Text")]
    pub url: String,
    pub timestamp: String,
    pub alias: Option<String>,
    /// Raw payload as written by the scan engine (single-quoted JSON)
    #[sea_orm(column_type = "Text", nullable)]
    pub results: Option<String>,
    /// SHA-256 hex digest, the external identifier
    #[sea_orm(unique)]
    pub hashid: String,
    pub seo: Option<f64>,
    pub accessibility: Option<f64>,
    pub usability: Option<f64>,
    pub userid: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::Userid",
        to = "super::users::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Users,
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Users.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
