//! Three sample completions against the configured endpoint.
//!
//! GLM_API_KEY=... RUST_LOG=info cargo run --example query

use std::io::Write;

use glm_complete::{Completion, CompletionClient, Request};

#[tokio::main]
async fn main()
{   env_logger::init();

    let client = match CompletionClient::from_env()
    {   Ok(c) => c,
        Err(e) => {
          eprintln!("{}", e);
          std::process::exit(1);
        }
    };

    // 1: plain call
    println!("--- 1: plain call ---");
    let request = Request::new(
      "Write a detailed analysis of the impact of AI on the \
       global economy, with real-world examples"
    )
      .with_temperature(0.5)
      .with_max_tokens(1500);
    match client.complete(&request).await
    {   Completion::Success { content, usage, elapsed_seconds } => {
          println!("\nAnswer: {}", content);
          println!("Response time: {:.2} s", elapsed_seconds);
          println!("Token usage: {:?}", usage.unwrap_or_default());
        }
      , Completion::Failure { message } => println!("{}", message)
    }

    // 2: streamed call, echoing fragments as they arrive
    println!("\n\n--- 2: streamed call ---");
    let request = Request::new(
      "Write a scientific summary of a quantum physics paper \
       with simple explanations"
    )
      .with_temperature(0.3)
      .with_max_tokens(2000)
      .with_stream(true);
    let (tx, mut rx) = glm_complete::fragment_channel();
    let printer = tokio::spawn(async move {
      while let Some(fragment) = rx.recv().await
      {   print!("{}", fragment);
          let _ = std::io::stdout().flush();
      }
    });
    let result = client.complete_streaming(&request, tx).await;
    let _ = printer.await;
    match result
    {   Completion::Success { elapsed_seconds, .. } => {
          println!("\nResponse time: {:.2} s", elapsed_seconds);
        }
      , Completion::Failure { message } => println!("{}", message)
    }

    // 3: code generation
    println!("\n\n--- 3: code generation ---");
    let request = Request::new(
      "Write a Python function that solves the dynamic programming \
       problem \"find the longest increasing subsequence in an array\" \
       with:\n1. an explanation of the algorithm\n2. complete commented \
       code\n3. a runnable example"
    )
      .with_max_tokens(1800);
    match client.complete(&request).await
    {   Completion::Success { content, .. } => println!("{}", content)
      , Completion::Failure { message } => println!("{}", message)
    }
}
