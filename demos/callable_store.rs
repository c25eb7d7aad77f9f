//! A store shaped as a single call, with a custom subscribe that only
//! accepts a limited number of subscribers.

use storekit::{
    create_store, CallableStore, Immediate, Primitives, StoreConfig, Subscribe, Subscriber,
};

fn main() {
    println!("=== Callable Store Example ===\n");

    let factory = create_store(|p: Primitives<String>| {
        move |limit: usize| {
            let inner = p.subscribe.clone();
            let subscribers = p.subscribers.clone();
            let limited = Subscribe::<String>::custom(move |subscriber, requested| {
                if subscribers.len() >= limit {
                    println!("   (subscriber limit {} reached, ignoring)", limit);
                    return None;
                }
                inner.subscribe_immediate(subscriber, requested)
            });
            CallableStore::new(&p).with_subscribe(limited)
        }
    })
    .with_config(StoreConfig::default().immediate(Immediate::OnRequest));

    let name = factory.build(1);

    println!("Initial: {:?}", name.call(vec![]));
    println!("Write:   {:?}", name.call(vec!["Ferris".to_string()]));

    let greeter = Subscriber::new(|args: &[String]| {
        if let Some(name) = args.first() {
            println!("   Hello, {}!", name);
        }
    });
    let shouter = Subscriber::new(|args: &[String]| {
        println!("   {}", args.join(" ").to_uppercase());
    });

    name.subscribe(&greeter);
    name.subscribe(&shouter);

    name.call(vec!["Corro".to_string(), "the".to_string(), "crab".to_string()]);
    println!("Read:    {:?}", name.call(vec![]));
}
