use garderobe::clothing::{
    ClothingItemPatch, ClothingRepository, NewClothingItem, SqliteClothingRepository,
};
use garderobe::db;
use garderobe::db::models::{ClothingType, Color, Occasion};
use garderobe::error::AppError;
use garderobe::outfits::{NewOutfit, OutfitRepository, SqliteOutfitRepository};
use garderobe::state::DbPool;
use garderobe::users;
use garderobe::wardrobe;
use tempfile::TempDir;

fn setup_db() -> (DbPool, TempDir) {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("test.db");
    let pool = db::create_pool(&db_path).expect("Failed to create test database");
    db::run_migrations(&pool).expect("Failed to run migrations");
    (pool, temp_dir)
}

async fn seed_wardrobe(pool: &DbPool, external_id: &str) -> (String, Vec<i64>) {
    let user = users::find_or_create_user(pool, external_id).unwrap().user;
    let clothing = SqliteClothingRepository::new(pool.clone());

    let mut ids = Vec::new();
    for (kind, color) in [
        (ClothingType::Shirt, Color::Blue),
        (ClothingType::Shirt, Color::Red),
        (ClothingType::Pants, Color::Black),
        (ClothingType::Shoes, Color::White),
        (ClothingType::Jumper, Color::Beige),
    ] {
        let item = clothing
            .create(
                &user.id,
                NewClothingItem {
                    kind,
                    color: Some(color),
                    picture: Some("https://img.example/item.png".into()),
                    description: None,
                },
            )
            .await
            .unwrap();
        ids.push(item.id);
    }

    (user.id, ids)
}

#[tokio::test]
async fn wardrobe_groups_items_by_capitalized_type() {
    let (pool, _temp) = setup_db();
    let (user_id, _ids) = seed_wardrobe(&pool, "ext_u").await;

    let data = wardrobe::get_wardrobe(&pool, &user_id).unwrap();

    assert_eq!(data.len(), 4);
    assert_eq!(data["Shirt"].len(), 2);
    assert_eq!(data["Pants"].len(), 1);
    assert_eq!(data["Shoes"].len(), 1);
    assert_eq!(data["Jumper"].len(), 1);

    // Display names are normalized
    assert_eq!(data["Jumper"][0].name.as_deref(), Some("Beige jumper"));
}

#[tokio::test]
async fn empty_wardrobe_is_a_not_found_condition() {
    let (pool, _temp) = setup_db();
    let user = users::find_or_create_user(&pool, "ext_empty").unwrap().user;

    let result = wardrobe::get_wardrobe(&pool, &user.id);
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn wardrobe_only_shows_the_callers_items() {
    let (pool, _temp) = setup_db();
    let (_owner, _ids) = seed_wardrobe(&pool, "ext_owner").await;
    let other = users::find_or_create_user(&pool, "ext_other").unwrap().user;

    let clothing = SqliteClothingRepository::new(pool.clone());
    clothing
        .create(
            &other.id,
            NewClothingItem {
                kind: ClothingType::Hoodie,
                color: Some(Color::Grey),
                picture: None,
                description: None,
            },
        )
        .await
        .unwrap();

    let data = wardrobe::get_wardrobe(&pool, &other.id).unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data["Hoodie"].len(), 1);
}

#[tokio::test]
async fn enrichment_reflects_outfit_history_and_neighbors() {
    let (pool, _temp) = setup_db();
    let (user_id, ids) = seed_wardrobe(&pool, "ext_u").await;

    let outfits = SqliteOutfitRepository::new(pool.clone());
    let outfit = outfits
        .create(
            &user_id,
            NewOutfit {
                parts: vec![ids[0], ids[2], ids[3]],
                occasion: Occasion::Work,
                picture: "https://img.example/outfit.png".into(),
                preview: vec![],
            },
        )
        .await
        .unwrap();

    let data = wardrobe::get_wardrobe(&pool, &user_id).unwrap();
    let blue_shirt = data["Shirt"].iter().find(|i| i.id == ids[0]).unwrap();

    let neighbor_ids: Vec<i64> = blue_shirt.worn_with.iter().map(|n| n.item.id).collect();
    assert_eq!(neighbor_ids.len(), 2);
    assert!(neighbor_ids.contains(&ids[2]));
    assert!(neighbor_ids.contains(&ids[3]));

    assert_eq!(blue_shirt.outfits.len(), 1);
    assert_eq!(blue_shirt.outfits[0].id, outfit.id);
    assert_eq!(blue_shirt.outfits[0].occasion, Occasion::Work);
    assert_eq!(blue_shirt.outfits[0].times_worn, 0);
}

#[tokio::test]
async fn repeated_queries_return_identical_groupings() {
    let (pool, _temp) = setup_db();
    let (user_id, ids) = seed_wardrobe(&pool, "ext_u").await;

    let outfits = SqliteOutfitRepository::new(pool.clone());
    outfits
        .create(
            &user_id,
            NewOutfit {
                parts: vec![ids[0], ids[2]],
                occasion: Occasion::Casual,
                picture: "https://img.example/outfit.png".into(),
                preview: vec![],
            },
        )
        .await
        .unwrap();

    let first = serde_json::to_value(wardrobe::get_wardrobe(&pool, &user_id).unwrap()).unwrap();
    let second = serde_json::to_value(wardrobe::get_wardrobe(&pool, &user_id).unwrap()).unwrap();
    assert_eq!(first, second);
}

#[tokio::test]
async fn patching_color_renames_item_in_wardrobe_view() {
    let (pool, _temp) = setup_db();
    let (user_id, ids) = seed_wardrobe(&pool, "ext_u").await;

    let clothing = SqliteClothingRepository::new(pool.clone());
    clothing
        .update(
            &user_id,
            ids[0],
            ClothingItemPatch {
                color: Some(Color::Green),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let data = wardrobe::get_wardrobe(&pool, &user_id).unwrap();
    let shirt = data["Shirt"].iter().find(|i| i.id == ids[0]).unwrap();
    assert_eq!(shirt.name.as_deref(), Some("Green shirt"));
    assert_eq!(shirt.color, Some(Color::Green));
}

#[tokio::test]
async fn random_outfit_draws_from_own_wardrobe_only() {
    let (pool, _temp) = setup_db();
    let (user_id, ids) = seed_wardrobe(&pool, "ext_u").await;

    let selection = wardrobe::random_outfit(&pool, &user_id).unwrap();
    assert_eq!(selection.len(), 3);
    assert_eq!(selection[0].kind, ClothingType::Shirt);
    assert_eq!(selection[1].kind, ClothingType::Pants);
    assert_eq!(selection[2].kind, ClothingType::Shoes);
    for item in &selection {
        assert!(ids.contains(&item.id));
    }
}

#[tokio::test]
async fn deleting_an_item_removes_it_from_the_wardrobe() {
    let (pool, _temp) = setup_db();
    let (user_id, ids) = seed_wardrobe(&pool, "ext_u").await;

    let clothing = SqliteClothingRepository::new(pool.clone());
    clothing.delete(&user_id, ids[4]).await.unwrap();

    let data = wardrobe::get_wardrobe(&pool, &user_id).unwrap();
    assert!(!data.contains_key("Jumper"));
}
