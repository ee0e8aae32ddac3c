use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Employees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Employees::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Employees::EmployeeNumber)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::EmployeeName)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::EmployeeDob).date().not_null())
                    .col(
                        ColumnDef::new(Employees::EmployeeFirstname)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::EmployeeLastname)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Employees::EmployeeCity)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Employees::CreatedAt).timestamp_with_time_zone())
                    .col(ColumnDef::new(Employees::UpdatedAt).timestamp_with_time_zone())
                    .to_owned(),
            )
            .await?;

        // Authoritative guard for the business key; concurrent writers that
        // both pass the pre-check are serialized here.
        manager
            .create_index(
                Index::create()
                    .name("idx_employees_employee_number")
                    .table(Employees::Table)
                    .col(Employees::EmployeeNumber)
                    .unique()
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Employees::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
enum Employees {
    Table,
    Id,
    EmployeeNumber,
    EmployeeName,
    EmployeeDob,
    EmployeeFirstname,
    EmployeeLastname,
    EmployeeCity,
    CreatedAt,
    UpdatedAt,
}
