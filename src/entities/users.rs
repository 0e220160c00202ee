use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,

    pub name: String,

    #[sea_orm(unique)]
    pub email: String,

    #[sea_orm(default_value = 31)]
    pub scan_quota: i32,

    #[sea_orm(default_value = false)]
    pub is_admin: bool,

    /// PBKDF2-SHA256 PHC string, never the plaintext
    #[sea_orm(column_type = "Text")]
    pub password: String,

    /// Most recently issued session token
    #[sea_orm(column_type = "Text", nullable)]
    pub token: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::reports::Entity")]
    Reports,
}

impl Related<super::reports::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reports.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
