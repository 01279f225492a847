use memcached_binary::{BinaryProtocol, Client};

#[tokio::main]
async fn main() {
    let mut client = Client::connect("tcp://127.0.0.1:11211")
        .await
        .expect("failed to create client");

    match client.get("foo").await {
        Ok(value) => println!("got value for 'foo': {:?}", value),
        Err(e) => println!("got error during 'foo' get: {:?}", e),
    }

    match client.set("foo", "might do popeyes", None, Some(5)).await {
        Ok(ack) => println!("set 'foo' successfully, cas {}", ack.cas),
        Err(e) => println!("got error during 'foo' set: {:?}", e),
    }

    match client.set("bar", 42u64, Some(0xbeef), None).await {
        Ok(ack) => println!("set 'bar' successfully, cas {}", ack.cas),
        Err(e) => println!("got error during 'bar' set: {:?}", e),
    }

    for key in ["foo", "bar", "baz"] {
        match client.get(key).await {
            Ok(Some(value)) => println!(
                "got '{}' = {:?} with flags {:#x}",
                key,
                String::from_utf8_lossy(&value.data),
                value.flags
            ),
            Ok(None) => println!("'{}' is not stored", key),
            Err(e) => println!("got error during '{}' get: {:?}", key, e),
        }
    }

    client.close().await;
}
