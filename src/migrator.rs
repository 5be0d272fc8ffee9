use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260101_000001_create_catalog_tables::Migration),
            Box::new(m20260101_000002_create_phone_cases_table::Migration),
            Box::new(m20260101_000003_create_auth_tables::Migration),
            Box::new(m20260101_000004_create_order_tables::Migration),
        ]
    }
}

// Migration implementations

mod m20260101_000001_create_catalog_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000001_create_catalog_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Models::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Models::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Models::Name).string().not_null())
                        .col(ColumnDef::new(Models::Year).integer().not_null())
                        .col(ColumnDef::new(Models::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(Models::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Models::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Materials::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Materials::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Materials::Name).string().not_null())
                        .col(ColumnDef::new(Materials::Description).string().not_null())
                        .col(ColumnDef::new(Materials::Price).decimal().not_null())
                        .col(
                            ColumnDef::new(Materials::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Materials::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Colors::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Colors::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Colors::Name).string().not_null())
                        .col(ColumnDef::new(Colors::Hex).string().not_null())
                        .col(
                            ColumnDef::new(Colors::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Colors::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Colors::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Materials::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Models::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Models {
        Table,
        Id,
        Name,
        Year,
        Price,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Materials {
        Table,
        Id,
        Name,
        Description,
        Price,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Colors {
        Table,
        Id,
        Name,
        Hex,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000002_create_phone_cases_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000002_create_phone_cases_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(PhoneCases::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PhoneCases::Id)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PhoneCases::Image).string().not_null())
                        .col(
                            ColumnDef::new(PhoneCases::CroppedImage)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PhoneCases::Width).integer().not_null())
                        .col(ColumnDef::new(PhoneCases::Height).integer().not_null())
                        .col(ColumnDef::new(PhoneCases::Price).decimal().not_null())
                        .col(ColumnDef::new(PhoneCases::TotalPrice).decimal().not_null())
                        .col(ColumnDef::new(PhoneCases::UserId).uuid().null())
                        .col(ColumnDef::new(PhoneCases::ModelId).uuid().null())
                        .col(ColumnDef::new(PhoneCases::MaterialId).uuid().null())
                        .col(ColumnDef::new(PhoneCases::ColorId).uuid().null())
                        .col(
                            ColumnDef::new(PhoneCases::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PhoneCases::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PhoneCases::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum PhoneCases {
        Table,
        Id,
        Image,
        CroppedImage,
        Width,
        Height,
        Price,
        TotalPrice,
        UserId,
        ModelId,
        MaterialId,
        ColorId,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000003_create_auth_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000003_create_auth_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Users::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Users::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Users::Name).string().not_null())
                        .col(
                            ColumnDef::new(Users::Email)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(
                            ColumnDef::new(Users::EmailVerified)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Users::Image).string().null())
                        .col(
                            ColumnDef::new(Users::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Users::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Sessions::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Sessions::Id).uuid().primary_key().not_null())
                        .col(
                            ColumnDef::new(Sessions::Token)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Sessions::UserId).uuid().not_null())
                        .col(
                            ColumnDef::new(Sessions::ExpiresAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Sessions::IpAddress).string().null())
                        .col(ColumnDef::new(Sessions::UserAgent).string().null())
                        .col(
                            ColumnDef::new(Sessions::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Sessions::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Sessions::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Users::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Users {
        Table,
        Id,
        Name,
        Email,
        EmailVerified,
        Image,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum Sessions {
        Table,
        Id,
        Token,
        UserId,
        ExpiresAt,
        IpAddress,
        UserAgent,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20260101_000004_create_order_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20260101_000004_create_order_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            for table in [
                ShippingAddresses::Table.into_table_ref(),
                BillingAddresses::Table.into_table_ref(),
            ] {
                manager
                    .create_table(
                        Table::create()
                            .table(table)
                            .if_not_exists()
                            .col(
                                ColumnDef::new(AddressColumn::Id)
                                    .uuid()
                                    .primary_key()
                                    .not_null(),
                            )
                            .col(ColumnDef::new(AddressColumn::Name).string().not_null())
                            .col(ColumnDef::new(AddressColumn::Street).string().not_null())
                            .col(ColumnDef::new(AddressColumn::City).string().not_null())
                            .col(
                                ColumnDef::new(AddressColumn::PostalCode)
                                    .string()
                                    .not_null(),
                            )
                            .col(ColumnDef::new(AddressColumn::Country).string().not_null())
                            .col(
                                ColumnDef::new(AddressColumn::PhoneNumber)
                                    .string()
                                    .not_null(),
                            )
                            .to_owned(),
                    )
                    .await?;
            }

            manager
                .create_table(
                    Table::create()
                        .table(Orders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Orders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Orders::Price).big_integer().not_null())
                        .col(
                            ColumnDef::new(Orders::IsPaid)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Orders::Status)
                                .string()
                                .not_null()
                                .default("pending"),
                        )
                        .col(
                            ColumnDef::new(Orders::StripeSessionId)
                                .string()
                                .not_null()
                                .unique_key(),
                        )
                        .col(ColumnDef::new(Orders::PhoneCaseId).string().not_null())
                        .col(ColumnDef::new(Orders::UserId).uuid().not_null())
                        .col(ColumnDef::new(Orders::ShippingId).uuid().not_null())
                        .col(ColumnDef::new(Orders::BillingId).uuid().not_null())
                        .col(
                            ColumnDef::new(Orders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(Orders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_created_at")
                        .table(Orders::Table)
                        .col(Orders::CreatedAt)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_orders_user_id")
                        .table(Orders::Table)
                        .col(Orders::UserId)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(Orders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BillingAddresses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ShippingAddresses::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    pub enum Orders {
        Table,
        Id,
        Price,
        IsPaid,
        Status,
        StripeSessionId,
        PhoneCaseId,
        UserId,
        ShippingId,
        BillingId,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    pub enum ShippingAddresses {
        Table,
    }

    #[derive(DeriveIden)]
    pub enum BillingAddresses {
        Table,
    }

    #[derive(DeriveIden)]
    pub enum AddressColumn {
        Id,
        Name,
        Street,
        City,
        PostalCode,
        Country,
        PhoneNumber,
    }
}
