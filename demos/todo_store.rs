//! A domain-shaped store: the constructor exposes todo operations instead
//! of raw get/set.
//!
//! Run with `RUST_LOG=storekit=trace` to see the store's own log events.

use storekit::{create_store, Get, Primitives, Set, StoreObject, Subscribe, Subscriber};
use tracing_subscriber::EnvFilter;

#[derive(Clone, Debug)]
struct TodoItem {
    id: usize,
    title: String,
    completed: bool,
}

#[derive(Clone, Debug, PartialEq)]
enum TodoFilter {
    All,
    Active,
    Completed,
}

#[derive(Clone, Debug)]
struct AppState {
    todos: Vec<TodoItem>,
    filter: TodoFilter,
}

impl AppState {
    fn new(titles: &[&str]) -> Self {
        let mut state = Self {
            todos: Vec::new(),
            filter: TodoFilter::All,
        };
        for title in titles {
            state.add_todo(title.to_string());
        }
        state
    }

    fn add_todo(&mut self, title: String) {
        let id = self.todos.len();
        self.todos.push(TodoItem {
            id,
            title,
            completed: false,
        });
    }

    fn toggle_todo(&mut self, id: usize) {
        if let Some(todo) = self.todos.iter_mut().find(|t| t.id == id) {
            todo.completed = !todo.completed;
        }
    }

    fn filtered_todos(&self) -> Vec<&TodoItem> {
        match self.filter {
            TodoFilter::All => self.todos.iter().collect(),
            TodoFilter::Active => self.todos.iter().filter(|t| !t.completed).collect(),
            TodoFilter::Completed => self.todos.iter().filter(|t| t.completed).collect(),
        }
    }

    fn stats(&self) -> (usize, usize, usize) {
        let total = self.todos.len();
        let completed = self.todos.iter().filter(|t| t.completed).count();
        let active = total - completed;
        (total, active, completed)
    }
}

struct TodoStore {
    get: Get<AppState>,
    set: Set<AppState>,
    subscribe: Option<Subscribe<AppState>>,
}

impl TodoStore {
    fn edit(&self, f: impl FnOnce(&mut AppState)) {
        self.set.update(|current| {
            let mut next = current.cloned().unwrap_or_else(|| AppState::new(&[]));
            f(&mut next);
            next
        });
    }

    fn add(&self, title: &str) {
        self.edit(|state| state.add_todo(title.to_string()));
    }

    fn toggle(&self, id: usize) {
        self.edit(|state| state.toggle_todo(id));
    }

    fn show(&self, filter: TodoFilter) {
        self.edit(|state| state.filter = filter);
    }

    fn print(&self) {
        self.get.with(|state| {
            for todo in state.map(AppState::filtered_todos).unwrap_or_default() {
                let status = if todo.completed { "✓" } else { " " };
                println!("   [{}] {}", status, todo.title);
            }
        });
    }

    fn on_change(&self, subscriber: &Subscriber<AppState>) {
        if let Some(subscribe) = &self.subscribe {
            subscribe.subscribe(subscriber);
        }
    }
}

impl StoreObject<AppState> for TodoStore {
    fn subscribe_slot(&mut self) -> &mut Option<Subscribe<AppState>> {
        &mut self.subscribe
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Store Example: Todo App ===\n");

    let factory = create_store(|p: Primitives<AppState>| {
        move |titles: Vec<&'static str>| {
            p.set.set(AppState::new(&titles));
            TodoStore {
                get: p.get.clone(),
                set: p.set.clone(),
                subscribe: None,
            }
        }
    });

    let store = factory.build(vec!["Learn Rust"]);

    // Fires once right away with the initial state.
    println!("1. Setting up subscriber");
    store.on_change(&Subscriber::new(|args: &[AppState]| {
        if let Some(state) = args.first() {
            let (total, active, completed) = state.stats();
            println!(
                "   [Store Update] Total: {}, Active: {}, Completed: {}",
                total, active, completed
            );
        }
    }));

    println!("\n2. Adding todos");
    store.add("Build a store factory");
    store.add("Write documentation");

    println!("\n3. Current todos:");
    store.print();

    println!("\n4. Completing first todo");
    store.toggle(0);

    println!("\n5. Filtering to show only active todos");
    store.show(TodoFilter::Active);
    store.print();

    println!("\n6. Filtering to show completed todos");
    store.show(TodoFilter::Completed);
    store.print();

    println!("\n✓ Example complete!");
}
