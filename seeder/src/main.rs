use migration::Migrator;
use sea_orm_migration::MigratorTrait;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let db = db::connect().await;

    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");

    if seeder::verify::all_tables_populated(&db)
        .await
        .expect("Failed to inspect tables")
    {
        println!("All tables already contain data, nothing to seed.");
        return;
    }

    let summary = seeder::seed_all(&db).await;
    if !summary.all_ok() {
        for (phase, err) in &summary.failed {
            eprintln!("phase {phase} failed: {err}");
        }
        std::process::exit(1);
    }
}
