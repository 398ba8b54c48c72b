///  To run :
///  cargo r --example client_example
use products_client::{ApiError, CreateProductRequest, ProductsClient};
use products_hex::application::product_service::ProductService;
use products_hex::inbound::http::{HttpServer, HttpServerConfig};
use products_repo::build_repo;
use tempfile::tempdir;

fn find_free_port() -> u16 {
    std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port()
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let port = find_free_port();
    let addr = format!("http://127.0.0.1:{port}/");

    // Use a temp file-backed SQLite DB so multiple connections see the same data.
    let tmp = tempdir()?;
    let db_path = tmp.path().join("products.db");
    let db_url = format!("sqlite://{}", db_path.display());

    let repo = build_repo(&db_url).await?;
    let service = ProductService::new(repo);
    let server = HttpServer::new(
        service,
        HttpServerConfig {
            port: port.to_string(),
        },
    )
    .await?;

    let handle = tokio::spawn(async move {
        server.run().await.expect("server run");
    });
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let client = ProductsClient::new(&addr)?;
    println!("Health ok={}", client.health().await?.ok);

    for (name, price) in [(" Widget ", 9.99), ("Gadget", 24.0), ("Gizmo", 0.5)] {
        let created = client
            .create_product(CreateProductRequest {
                name: name.into(),
                price,
            })
            .await?;
        println!("Created product id={} name={:?}", created.id, created.name);
    }

    let rejected = client
        .create_product(CreateProductRequest {
            name: "Broken".into(),
            price: -1.0,
        })
        .await;
    match rejected {
        Err(err) => match err.downcast_ref::<ApiError>() {
            Some(api) => println!("Rejected as expected: {api}"),
            None => return Err(err),
        },
        Ok(p) => anyhow::bail!("negative price was accepted: {p:?}"),
    }

    for product in client.list_products().await? {
        println!("{} {:>8.2} {}", product.created_at, product.price, product.name);
    }

    handle.abort();
    Ok(())
}
