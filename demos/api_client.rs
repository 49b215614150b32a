//! API Client Example
//!
//! Walks through the API with the typed client: register, log in, create and
//! search items, then clean up. Start the server first, e.g.
//! `STORAGE_BACKEND=memory JWT_SECRET=... cargo run`.

use webapp_api::{
    client::ApiClient,
    models::{CreateItemRequest, ListItemsParams, RegisterRequest, UpdateItemRequest},
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let base_url =
        std::env::var("API_BASE_URL").unwrap_or_else(|_| "http://localhost:3000".to_string());
    let mut client = ApiClient::new(base_url);

    // Health check
    println!("Checking service health...");
    match client.health().await {
        Ok(health) => println!("Service is {} (v{})", health.status, health.version),
        Err(e) => {
            println!("Service health check failed: {}", e);
            return Ok(());
        }
    }

    // Register
    println!("\nRegistering a new user...");
    let email = format!("bob.{}@example.com", uuid::Uuid::new_v4().simple());
    let password = "MySecurePassword123";
    let user = client
        .register(&RegisterRequest {
            name: "Bob Smith".to_string(),
            email: email.clone(),
            password: password.to_string(),
        })
        .await?;
    println!("Registered {} with ID {} (role: {})", user.email, user.id, user.role);

    // Registering the same email again is rejected
    if let Err(e) = client
        .register(&RegisterRequest {
            name: "Bob Again".to_string(),
            email: email.clone(),
            password: password.to_string(),
        })
        .await
    {
        println!("Duplicate registration rejected: {}", e);
    }

    // Log in
    println!("\nLogging in...");
    let login = client.login(&email, password).await?;
    println!(
        "Got a {} token valid for {}s",
        login.token.token_type, login.token.expires_in
    );

    let profile = client.profile().await?;
    println!("Profile: {} <{}>", profile.name, profile.email);

    // Items
    println!("\nCreating items...");
    let mut created = Vec::new();
    for (title, price) in [("Desk lamp", 24.5), ("Floor lamp", 79.0), ("Bookshelf", 120.0)] {
        let item = client
            .create_item(&CreateItemRequest {
                title: title.to_string(),
                description: format!("A {}", title.to_lowercase()),
                price,
            })
            .await?;
        println!("Created item {} ({})", item.title, item.id);
        created.push(item);
    }

    println!("\nSearching for lamps, most expensive first...");
    let page = client
        .list_items(&ListItemsParams::default().search("lamp").sort("-price").limit(10))
        .await?;
    println!("Found {} item(s):", page.total);
    for item in &page.items {
        println!("  {} - {:.2}", item.title, item.price);
    }

    let updated = client
        .update_item(
            created[0].id,
            &UpdateItemRequest {
                price: Some(19.99),
                ..Default::default()
            },
        )
        .await?;
    println!("\nUpdated {} price to {:.2}", updated.title, updated.price);

    // Clean up
    println!("\nDeleting account and its items...");
    client.delete_user(user.id).await?;
    client.logout();

    match client.get_item(created[1].id).await {
        Err(e) if e.status() == Some(404) => println!("Items were removed with the account"),
        other => println!("Unexpected result: {:?}", other.map(|item| item.id)),
    }

    Ok(())
}
