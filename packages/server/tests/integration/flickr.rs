use chrono::Utc;
use sea_orm::{ActiveModelTrait, NotSet, Set};

use facet_server::entity::flickr_photo;

use crate::common::{TestApp, routes};

async fn insert_photo(app: &TestApp, guest_id: i64) -> flickr_photo::Model {
    let now = Utc::now();
    flickr_photo::ActiveModel {
        id: NotSet,
        guest_id: Set(guest_id),
        flickr_id: Set("8612345678".into()),
        farm: Set("9".into()),
        server: Set("8123".into()),
        secret: Set("a1b2c3d4e5".into()),
        title: Set("Sunset over the bay".into()),
        // 2013-04-02 21:30:31 UTC
        date_taken: Set(1_364_938_231_000),
        time_created: Set(now),
        time_updated: Set(now),
    }
    .insert(&app.db)
    .await
    .expect("Failed to insert flickr photo")
}

#[tokio::test]
async fn flickr_photo_is_rendered_with_urls() {
    let app = TestApp::spawn().await;
    let photo = insert_photo(&app, 5).await;

    let res = app.get(&routes::flickr_photo(5, photo.id)).await;
    assert_eq!(res.status, 200, "get failed: {}", res.text());
    assert_eq!(res.body["start"], 1_364_938_231_000_i64);
    assert_eq!(res.body["start_minute"], 21 * 60 + 30);
    assert_eq!(res.body["time_type"], "local");
    assert_eq!(res.body["description"], "Sunset over the bay");
    assert_eq!(
        res.body["photo_url"],
        "http://farm9.static.flickr.com/8123/8612345678_a1b2c3d4e5_z.jpg"
    );

    let thumbnails = res.body["thumbnail_urls"].as_array().unwrap();
    assert_eq!(thumbnails.len(), 9);
    assert_eq!(
        thumbnails[0],
        "http://farm9.static.flickr.com/8123/8612345678_a1b2c3d4e5_s.jpg"
    );
    assert_eq!(res.body["thumbnail_sizes"][0]["width"], 75);
}

#[tokio::test]
async fn flickr_photo_of_another_guest_is_not_found() {
    let app = TestApp::spawn().await;
    let photo = insert_photo(&app, 5).await;

    let res = app.get(&routes::flickr_photo(6, photo.id)).await;
    assert_eq!(res.status, 404);
    assert_eq!(res.body["code"], "NOT_FOUND");
}
