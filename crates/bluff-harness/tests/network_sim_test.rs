//! End-to-end tests over turmoil's simulated TCP.
//!
//! The real frame transport (`spawn_io`) talks to a [`SimServer`], and a
//! [`Client`] processes whatever arrives.

use bluff_client::{
    Client, ClientAction, ClientConfig, ClientEvent,
    transport::{ConnectedClient, spawn_io},
};
use bluff_harness::{ScriptedTable, SimEnv, SimServer};
use bluff_proto::{ClientIntent, Player, PlayerId};
use turmoil::net::TcpStream;

type BoxError = Box<dyn std::error::Error>;

fn table() -> ScriptedTable {
    ScriptedTable::new(11, vec![Player::new("p1", ""), Player::new("p2", "Bot")])
}

/// Feed frames to the client, forwarding its sends, until `done` holds.
async fn pump_until(
    client: &mut Client<SimEnv>,
    conn: &mut ConnectedClient,
    done: impl Fn(&Client<SimEnv>) -> bool,
) -> Result<(), BoxError> {
    while !done(client) {
        let frame = conn.from_server.recv().await.ok_or("server hung up")?;
        for action in client.handle(ClientEvent::FrameReceived(frame))? {
            if let ClientAction::Send(frame) = action {
                conn.to_server.send(frame).await?;
            }
        }
    }
    Ok(())
}

async fn run_actions(
    conn: &ConnectedClient,
    actions: Vec<ClientAction>,
) -> Result<(), BoxError> {
    for action in actions {
        if let ClientAction::Send(frame) = action {
            conn.to_server.send(frame).await?;
        }
    }
    Ok(())
}

#[test]
fn client_joins_and_plays_over_simulated_tcp() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("server", || async {
        let mut server = SimServer::bind("0.0.0.0:3001", table()).await?;
        let id = server.accept().await?;

        let join = server.serve_next(&id).await?;
        assert!(matches!(join, ClientIntent::JoinRoom(ref j) if j.player_name == "Alice"));

        server.deal().await?;
        server.bots_until_turn(&id).await?;

        let play = server.serve_next(&id).await?;
        assert!(matches!(play, ClientIntent::PlayCards(_)));
        Ok(())
    });

    sim.client("player", async {
        let stream = TcpStream::connect("server:3001").await?;
        let (reader, writer) = tokio::io::split(stream);
        let mut conn = spawn_io(reader, writer);

        let mut client = Client::new(SimEnv::new(), ClientConfig::default().with_name("Alice"));
        pump_until(&mut client, &mut conn, |c| c.view().is_my_turn()).await?;
        assert_eq!(client.view().local_id(), Some(&PlayerId::from("p1")));
        assert_eq!(client.view().local_hand().len(), 26);

        let card = client.view().local_hand()[0].clone();
        let rank = client.view().declared_rank().map_or_else(|| card.rank_token().to_string(), str::to_string);
        let mut actions = client.handle(ClientEvent::SelectCards(vec![card.clone()]))?;
        actions.extend(client.handle(ClientEvent::BeginPlay)?);
        if client.is_awaiting_declaration() {
            actions.extend(client.handle(ClientEvent::ConfirmPlay { rank })?);
        }
        run_actions(&conn, actions).await?;

        pump_until(&mut client, &mut conn, |c| !c.view().local_hand().contains(&card)).await?;
        assert!(client.view().pile().iter().any(|play| play.cards.contains(&card)));
        assert!(client.view().selection().is_empty());
        Ok(())
    });

    sim.run().expect("simulation failed");
}

#[test]
fn client_survives_server_hangup() {
    let mut sim = turmoil::Builder::new().build();

    sim.host("server", || async {
        let mut server = SimServer::bind("0.0.0.0:3001", table()).await?;
        let _ = server.accept().await?;
        // Dropping the server closes the stream after the greeting.
        Ok(())
    });

    sim.client("player", async {
        let stream = TcpStream::connect("server:3001").await?;
        let (reader, writer) = tokio::io::split(stream);
        let mut conn = spawn_io(reader, writer);
        let mut client = Client::new(SimEnv::new(), ClientConfig::default());

        let mut frames = 0;
        while let Some(frame) = conn.from_server.recv().await {
            frames += 1;
            let _ = client.handle(ClientEvent::FrameReceived(frame))?;
        }

        assert_eq!(frames, 2);
        assert_eq!(client.view().local_id(), Some(&PlayerId::from("p1")));
        assert_eq!(client.view().players().len(), 2);
        Ok(())
    });

    sim.run().expect("simulation failed");
}
