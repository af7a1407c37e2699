//! In-memory doubles of the ports, shared by the use case tests.

use std::collections::{HashMap, HashSet, VecDeque};
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::application::ports::cover_extractor::CoverExtractor;
use crate::application::ports::group_repository::{AddMembersOutcome, GroupRepository};
use crate::application::ports::knowledge_graph_store::{
    AddNodeOutcome, AddRelationOutcome, KnowledgeGraphStore,
};
use crate::application::ports::object_store::{ObjectStore, StoredObject};
use crate::application::ports::resource_repository::ResourceRepository;
use crate::application::ports::user_repository::{InsertOutcome, UpdateOutcome, UserRepository};
use crate::application::use_cases::auth::password::hash_password;
use crate::domain::accounts::account::{Account, Credentials, UserType};
use crate::domain::groups::group::{Group, GroupDetail, GroupMember};
use crate::domain::knowledge::analysis::{
    ConnectionScore, PathRelationship, PathResult, PrerequisiteStats,
};
use crate::domain::knowledge::graph::{Graph, GraphLink, RelationRow};
use crate::domain::knowledge::import::{ImportSummary, ValidatedImport};
use crate::domain::knowledge::node::{GraphNode, NewNode, NodeKind};
use crate::domain::knowledge::relation::{RelationKind, RelationRef};
use crate::domain::resources::resource::{
    BucketKind, Courseware, Difficulty, Exercise, NewResource, Video,
};

pub fn account(user_id: &str, user_type: UserType) -> Account {
    Account {
        user_id: user_id.to_string(),
        nickname: format!("{user_id}-nick"),
        user_type,
    }
}

// ---------- accounts ----------

#[derive(Default)]
pub struct MemoryUsers {
    rows: Mutex<HashMap<String, Credentials>>,
}

impl MemoryUsers {
    pub async fn with(seed: &[(Account, &str)]) -> Self {
        let repo = MemoryUsers::default();
        for (acc, password) in seed {
            let hash = hash_password(password).unwrap();
            repo.insert(acc, &hash).await.unwrap();
        }
        repo
    }
}

#[async_trait]
impl UserRepository for MemoryUsers {
    async fn insert(&self, account: &Account, password_hash: &str) -> anyhow::Result<InsertOutcome> {
        let mut rows = self.rows.lock().await;
        let taken = rows.contains_key(&account.user_id)
            || rows.values().any(|c| c.account.nickname == account.nickname);
        if taken {
            return Ok(InsertOutcome::Duplicate);
        }
        rows.insert(
            account.user_id.clone(),
            Credentials {
                account: account.clone(),
                password_hash: password_hash.to_string(),
            },
        );
        Ok(InsertOutcome::Inserted)
    }

    async fn find_credentials(&self, user_id: &str) -> anyhow::Result<Option<Credentials>> {
        Ok(self.rows.lock().await.get(user_id).cloned())
    }

    async fn find(&self, user_id: &str) -> anyhow::Result<Option<Account>> {
        Ok(self.rows.lock().await.get(user_id).map(|c| c.account.clone()))
    }

    async fn list(&self) -> anyhow::Result<Vec<Account>> {
        let mut all: Vec<Account> = self
            .rows
            .lock()
            .await
            .values()
            .map(|c| c.account.clone())
            .collect();
        all.sort_by(|a, b| a.user_id.cmp(&b.user_id));
        Ok(all)
    }

    async fn update_profile(
        &self,
        user_id: &str,
        nickname: &str,
        user_type: UserType,
    ) -> anyhow::Result<UpdateOutcome> {
        let mut rows = self.rows.lock().await;
        if rows
            .values()
            .any(|c| c.account.user_id != user_id && c.account.nickname == nickname)
        {
            return Ok(UpdateOutcome::NicknameTaken);
        }
        match rows.get_mut(user_id) {
            Some(c) => {
                c.account.nickname = nickname.to_string();
                c.account.user_type = user_type;
                Ok(UpdateOutcome::Updated)
            }
            None => Ok(UpdateOutcome::NotFound),
        }
    }

    async fn update_password(&self, user_id: &str, password_hash: &str) -> anyhow::Result<bool> {
        let mut rows = self.rows.lock().await;
        match rows.get_mut(user_id) {
            Some(c) => {
                c.password_hash = password_hash.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_with_memberships(&self, user_id: &str) -> anyhow::Result<bool> {
        Ok(self.rows.lock().await.remove(user_id).is_some())
    }
}

// ---------- groups ----------

#[derive(Default)]
struct GroupState {
    next_id: i64,
    groups: Vec<Group>,
    members: Vec<(i64, String)>,
    users: HashMap<String, String>,
}

#[derive(Default)]
pub struct MemoryGroups {
    state: Mutex<GroupState>,
}

impl MemoryGroups {
    /// Users that exist as far as membership checks are concerned.
    pub fn with_users(ids: &[&str]) -> Self {
        let state = GroupState {
            users: ids
                .iter()
                .map(|id| (id.to_string(), format!("{id}-nick")))
                .collect(),
            ..Default::default()
        };
        MemoryGroups {
            state: Mutex::new(state),
        }
    }

    pub async fn member_count(&self, group_id: i64) -> usize {
        let st = self.state.lock().await;
        st.members.iter().filter(|(g, _)| *g == group_id).count()
    }
}

fn member(st: &GroupState, user_id: &str) -> GroupMember {
    GroupMember {
        user_id: user_id.to_string(),
        nickname: st.users.get(user_id).cloned().unwrap_or_default(),
    }
}

#[async_trait]
impl GroupRepository for MemoryGroups {
    async fn create(&self, owner: &str, name: &str) -> anyhow::Result<i64> {
        let mut st = self.state.lock().await;
        st.next_id += 1;
        let group_id = st.next_id;
        st.groups.push(Group {
            group_id,
            owner: owner.to_string(),
            name: name.to_string(),
        });
        Ok(group_id)
    }

    async fn owner_of(&self, group_id: i64) -> anyhow::Result<Option<String>> {
        let st = self.state.lock().await;
        Ok(st
            .groups
            .iter()
            .find(|g| g.group_id == group_id)
            .map(|g| g.owner.clone()))
    }

    async fn is_member(&self, group_id: i64, user_id: &str) -> anyhow::Result<bool> {
        let st = self.state.lock().await;
        Ok(st.members.iter().any(|(g, u)| *g == group_id && u == user_id))
    }

    async fn add_members(
        &self,
        group_id: i64,
        user_ids: &[String],
    ) -> anyhow::Result<AddMembersOutcome> {
        let mut st = self.state.lock().await;
        if user_ids.iter().any(|u| !st.users.contains_key(u)) {
            return Ok(AddMembersOutcome::UnknownUser);
        }
        let mut seen = HashSet::new();
        for u in user_ids {
            let exists = st.members.iter().any(|(g, m)| *g == group_id && m == u);
            if exists || !seen.insert(u.clone()) {
                return Ok(AddMembersOutcome::Duplicate);
            }
        }
        for u in user_ids {
            st.members.push((group_id, u.clone()));
        }
        Ok(AddMembersOutcome::Added(user_ids.len() as u64))
    }

    async fn remove_members(&self, group_id: i64, user_ids: &[String]) -> anyhow::Result<u64> {
        let mut st = self.state.lock().await;
        let before = st.members.len();
        st.members
            .retain(|(g, u)| !(*g == group_id && user_ids.contains(u)));
        Ok((before - st.members.len()) as u64)
    }

    async fn detail(&self, group_id: i64) -> anyhow::Result<Option<GroupDetail>> {
        let st = self.state.lock().await;
        let Some(group) = st.groups.iter().find(|g| g.group_id == group_id) else {
            return Ok(None);
        };
        let users = st
            .members
            .iter()
            .filter(|(g, _)| *g == group_id)
            .map(|(_, u)| member(&st, u))
            .collect();
        Ok(Some(GroupDetail {
            group_id,
            name: group.name.clone(),
            owner: member(&st, &group.owner),
            users,
        }))
    }

    async fn owned_by(&self, user_id: &str) -> anyhow::Result<Vec<Group>> {
        let st = self.state.lock().await;
        Ok(st
            .groups
            .iter()
            .filter(|g| g.owner == user_id)
            .cloned()
            .collect())
    }

    async fn joined_by(&self, user_id: &str) -> anyhow::Result<Vec<Group>> {
        let st = self.state.lock().await;
        Ok(st
            .groups
            .iter()
            .filter(|g| st.members.iter().any(|(gid, u)| *gid == g.group_id && u == user_id))
            .cloned()
            .collect())
    }

    async fn all(&self) -> anyhow::Result<Vec<Group>> {
        Ok(self.state.lock().await.groups.clone())
    }

    async fn rename(&self, group_id: i64, name: &str) -> anyhow::Result<bool> {
        let mut st = self.state.lock().await;
        match st.groups.iter_mut().find(|g| g.group_id == group_id) {
            Some(g) => {
                g.name = name.to_string();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete(&self, group_id: i64) -> anyhow::Result<bool> {
        let mut st = self.state.lock().await;
        st.members.retain(|(g, _)| *g != group_id);
        let before = st.groups.len();
        st.groups.retain(|g| g.group_id != group_id);
        Ok(st.groups.len() < before)
    }
}

// ---------- knowledge graph ----------

#[derive(Default)]
struct GraphState {
    next_id: i64,
    nodes: Vec<GraphNode>,
    edges: Vec<(i64, i64, RelationKind)>,
    props: HashMap<(i64, String), String>,
}

impl GraphState {
    fn find(&self, kind: NodeKind, name: &str) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.kind == kind && n.name == name)
    }

    fn by_id(&self, id: i64) -> Option<&GraphNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    fn create(&mut self, node: &NewNode) -> GraphNode {
        self.next_id += 1;
        let created = GraphNode {
            id: self.next_id,
            name: node.name.clone(),
            kind: node.kind,
            description: node.description.clone(),
        };
        self.nodes.push(created.clone());
        created
    }

    fn endpoints(&self, rel: &RelationRef) -> (Option<i64>, Option<i64>) {
        (
            self.find(rel.source_kind, &rel.source).map(|n| n.id),
            self.find(rel.target_kind, &rel.target).map(|n| n.id),
        )
    }

    fn links_among(&self, ids: &HashSet<i64>) -> Vec<GraphLink> {
        self.edges
            .iter()
            .filter(|(s, t, _)| ids.contains(s) && ids.contains(t))
            .map(|(s, t, k)| GraphLink {
                source: *s,
                target: *t,
                kind: k.as_str().to_string(),
            })
            .collect()
    }

    fn longest_prereq_chain(&self, id: i64, on_path: &mut HashSet<i64>) -> i64 {
        on_path.insert(id);
        let mut best = 0;
        for (s, t, k) in &self.edges {
            if *t == id && *k == RelationKind::Prerequisite && !on_path.contains(s) {
                best = best.max(1 + self.longest_prereq_chain(*s, on_path));
            }
        }
        on_path.remove(&id);
        best
    }
}

#[derive(Default)]
pub struct MemoryGraph {
    state: Mutex<GraphState>,
}

impl MemoryGraph {
    pub async fn node_count(&self) -> usize {
        self.state.lock().await.nodes.len()
    }

    pub async fn edge_count(&self) -> usize {
        self.state.lock().await.edges.len()
    }

    pub async fn property(&self, id: i64, property: &str) -> Option<String> {
        self.state
            .lock()
            .await
            .props
            .get(&(id, property.to_string()))
            .cloned()
    }
}

#[async_trait]
impl KnowledgeGraphStore for MemoryGraph {
    async fn ping(&self) -> anyhow::Result<()> {
        Ok(())
    }

    async fn add_node(&self, node: &NewNode) -> anyhow::Result<AddNodeOutcome> {
        let mut st = self.state.lock().await;
        if let Some(existing) = st.find(node.kind, &node.name) {
            return Ok(AddNodeOutcome::Existing(existing.clone()));
        }
        Ok(AddNodeOutcome::Created(st.create(node)))
    }

    async fn find_node(&self, kind: NodeKind, name: &str) -> anyhow::Result<Option<GraphNode>> {
        Ok(self.state.lock().await.find(kind, name).cloned())
    }

    async fn node_by_id(&self, kind: NodeKind, id: i64) -> anyhow::Result<Option<GraphNode>> {
        let st = self.state.lock().await;
        Ok(st.by_id(id).filter(|n| n.kind == kind).cloned())
    }

    async fn update_node_property(
        &self,
        kind: NodeKind,
        name: &str,
        property: &str,
        value: &str,
    ) -> anyhow::Result<bool> {
        let mut st = self.state.lock().await;
        let Some(id) = st.find(kind, name).map(|n| n.id) else {
            return Ok(false);
        };
        if property == "description" {
            if let Some(n) = st.nodes.iter_mut().find(|n| n.id == id) {
                n.description = value.to_string();
            }
        }
        st.props.insert((id, property.to_string()), value.to_string());
        Ok(true)
    }

    async fn delete_node_cascade(&self, kind: NodeKind, name: &str) -> anyhow::Result<Option<u64>> {
        let mut st = self.state.lock().await;
        let Some(root) = st.find(kind, name).map(|n| n.id) else {
            return Ok(None);
        };
        let mut doomed = HashSet::from([root]);
        if kind != NodeKind::Point {
            let mut queue = VecDeque::from([root]);
            while let Some(cur) = queue.pop_front() {
                for (s, t, k) in &st.edges {
                    if *s == cur && *k == RelationKind::Contains && doomed.insert(*t) {
                        queue.push_back(*t);
                    }
                }
            }
        }
        st.nodes.retain(|n| !doomed.contains(&n.id));
        st.edges
            .retain(|(s, t, _)| !doomed.contains(s) && !doomed.contains(t));
        Ok(Some(doomed.len() as u64))
    }

    async fn search(&self, keyword: &str) -> anyhow::Result<Vec<GraphNode>> {
        let st = self.state.lock().await;
        Ok(st
            .nodes
            .iter()
            .filter(|n| n.name.contains(keyword))
            .cloned()
            .collect())
    }

    async fn add_relation(&self, rel: &RelationRef) -> anyhow::Result<AddRelationOutcome> {
        let mut st = self.state.lock().await;
        let (Some(s), Some(t)) = st.endpoints(rel) else {
            let (s, _) = st.endpoints(rel);
            return Ok(if s.is_none() {
                AddRelationOutcome::SourceMissing
            } else {
                AddRelationOutcome::TargetMissing
            });
        };
        if st.edges.contains(&(s, t, rel.kind)) {
            return Ok(AddRelationOutcome::AlreadyExists);
        }
        st.edges.push((s, t, rel.kind));
        Ok(AddRelationOutcome::Created)
    }

    async fn delete_relations(&self, rel: &RelationRef) -> anyhow::Result<u64> {
        let mut st = self.state.lock().await;
        let (Some(s), Some(t)) = st.endpoints(rel) else {
            return Ok(0);
        };
        let before = st.edges.len();
        st.edges.retain(|e| *e != (s, t, rel.kind));
        Ok((before - st.edges.len()) as u64)
    }

    async fn replace_relation(
        &self,
        old: &RelationRef,
        new_kind: RelationKind,
    ) -> anyhow::Result<bool> {
        let mut st = self.state.lock().await;
        let (Some(s), Some(t)) = st.endpoints(old) else {
            return Ok(false);
        };
        if !st.edges.contains(&(s, t, old.kind)) {
            return Ok(false);
        }
        st.edges.retain(|e| *e != (s, t, old.kind));
        st.edges.push((s, t, new_kind));
        Ok(true)
    }

    async fn relations_between(
        &self,
        source: NodeKind,
        target: NodeKind,
    ) -> anyhow::Result<Vec<RelationRow>> {
        let st = self.state.lock().await;
        Ok(st
            .edges
            .iter()
            .filter_map(|(s, t, k)| {
                let (a, b) = (st.by_id(*s)?, st.by_id(*t)?);
                (a.kind == source && b.kind == target).then(|| RelationRow {
                    source: a.name.clone(),
                    target: b.name.clone(),
                    kind: k.as_str().to_string(),
                })
            })
            .collect())
    }

    async fn graph_of(&self, kind: NodeKind) -> anyhow::Result<Graph> {
        let st = self.state.lock().await;
        let nodes: Vec<GraphNode> = st.nodes.iter().filter(|n| n.kind == kind).cloned().collect();
        let ids = nodes.iter().map(|n| n.id).collect();
        Ok(Graph {
            links: st.links_among(&ids),
            nodes,
        })
    }

    async fn children_of(&self, parent: NodeKind, parent_id: i64) -> anyhow::Result<Graph> {
        let st = self.state.lock().await;
        let Some(child_kind) = parent.child() else {
            return Ok(Graph::default());
        };
        if st.by_id(parent_id).filter(|n| n.kind == parent).is_none() {
            return Ok(Graph::default());
        }
        let nodes: Vec<GraphNode> = st
            .edges
            .iter()
            .filter(|(s, _, k)| *s == parent_id && *k == RelationKind::Contains)
            .filter_map(|(_, t, _)| st.by_id(*t))
            .filter(|n| n.kind == child_kind)
            .cloned()
            .collect();
        let ids = nodes.iter().map(|n| n.id).collect();
        Ok(Graph {
            links: st.links_among(&ids),
            nodes,
        })
    }

    async fn shortest_path(
        &self,
        start: (NodeKind, &str),
        end: (NodeKind, &str),
    ) -> anyhow::Result<Option<PathResult>> {
        let st = self.state.lock().await;
        let (Some(from), Some(to)) = (st.find(start.0, start.1), st.find(end.0, end.1)) else {
            return Ok(None);
        };
        let (from, to) = (from.id, to.id);
        let mut prev: HashMap<i64, (i64, RelationKind)> = HashMap::new();
        let mut seen = HashSet::from([from]);
        let mut queue = VecDeque::from([from]);
        while let Some(cur) = queue.pop_front() {
            if cur == to {
                break;
            }
            for (s, t, k) in &st.edges {
                if *s == cur && seen.insert(*t) {
                    prev.insert(*t, (cur, *k));
                    queue.push_back(*t);
                }
            }
        }
        if from != to && !prev.contains_key(&to) {
            return Ok(None);
        }
        let mut ids = vec![to];
        let mut rels = Vec::new();
        let mut cur = to;
        while let Some((p, k)) = prev.get(&cur) {
            rels.push(PathRelationship {
                source: *p,
                target: cur,
                kind: k.as_str().to_string(),
            });
            ids.push(*p);
            cur = *p;
        }
        ids.reverse();
        rels.reverse();
        let nodes = ids.iter().filter_map(|id| st.by_id(*id).cloned()).collect();
        Ok(Some(PathResult::new(nodes, rels)))
    }

    async fn prerequisite_stats(&self, point_id: i64) -> anyhow::Result<Option<PrerequisiteStats>> {
        let st = self.state.lock().await;
        if st.by_id(point_id).filter(|n| n.kind == NodeKind::Point).is_none() {
            return Ok(None);
        }
        let mut ancestors = HashSet::new();
        let mut queue = VecDeque::from([point_id]);
        while let Some(cur) = queue.pop_front() {
            for (s, t, k) in &st.edges {
                if *t == cur && *k == RelationKind::Prerequisite && *s != point_id && ancestors.insert(*s) {
                    queue.push_back(*s);
                }
            }
        }
        let max_depth = st.longest_prereq_chain(point_id, &mut HashSet::new());
        Ok(Some(PrerequisiteStats {
            prereq_count: ancestors.len() as i64,
            max_depth,
        }))
    }

    async fn degree_ranking(&self, limit: Option<i64>) -> anyhow::Result<Vec<ConnectionScore>> {
        let st = self.state.lock().await;
        let mut scores: Vec<ConnectionScore> = st
            .nodes
            .iter()
            .map(|n| ConnectionScore {
                name: n.name.clone(),
                kind: n.kind,
                score: st
                    .edges
                    .iter()
                    .filter(|(s, t, _)| *s == n.id || *t == n.id)
                    .count() as f64,
            })
            .collect();
        scores.sort_by(|a, b| b.score.total_cmp(&a.score).then_with(|| a.name.cmp(&b.name)));
        if let Some(limit) = limit {
            scores.truncate(limit.max(0) as usize);
        }
        Ok(scores)
    }

    async fn import(&self, doc: &ValidatedImport) -> anyhow::Result<ImportSummary> {
        let mut st = self.state.lock().await;
        let mut summary = ImportSummary::default();
        for node in &doc.nodes {
            if st.find(node.kind, &node.name).is_some() {
                summary.nodes_existing += 1;
            } else {
                st.create(node);
                summary.nodes_created += 1;
            }
        }
        for rel in &doc.relations {
            match st.endpoints(rel) {
                (Some(s), Some(t)) if st.edges.contains(&(s, t, rel.kind)) => {
                    summary.relations_existing += 1
                }
                (Some(s), Some(t)) => {
                    st.edges.push((s, t, rel.kind));
                    summary.relations_created += 1;
                }
                _ => summary.relations_unresolved += 1,
            }
        }
        Ok(summary)
    }
}

// ---------- resources ----------

#[derive(Default)]
struct ResourceState {
    next_id: i64,
    videos: Vec<Video>,
    coursewares: Vec<Courseware>,
    exercises: Vec<Exercise>,
}

#[derive(Default)]
pub struct MemoryResources {
    state: Mutex<ResourceState>,
    pub fail_inserts: bool,
}

impl MemoryResources {
    pub fn failing() -> Self {
        MemoryResources {
            fail_inserts: true,
            ..Default::default()
        }
    }

    async fn next_id(&self) -> anyhow::Result<i64> {
        if self.fail_inserts {
            anyhow::bail!("insert rejected");
        }
        let mut st = self.state.lock().await;
        st.next_id += 1;
        Ok(st.next_id)
    }
}

#[async_trait]
impl ResourceRepository for MemoryResources {
    async fn insert_video(&self, res: &NewResource) -> anyhow::Result<i64> {
        let id = self.next_id().await?;
        let now = chrono::Utc::now();
        self.state.lock().await.videos.push(Video {
            id,
            title: res.title.clone(),
            play_url: res.url.clone(),
            cover_url: res.cover_url.clone(),
            description: res.description.clone(),
            point_id: res.point_id,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn insert_courseware(&self, res: &NewResource) -> anyhow::Result<i64> {
        let id = self.next_id().await?;
        let now = chrono::Utc::now();
        self.state.lock().await.coursewares.push(Courseware {
            id,
            title: res.title.clone(),
            courseware_url: res.url.clone(),
            description: res.description.clone(),
            point_id: res.point_id,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn insert_exercise(&self, res: &NewResource) -> anyhow::Result<i64> {
        let id = self.next_id().await?;
        let now = chrono::Utc::now();
        self.state.lock().await.exercises.push(Exercise {
            id,
            title: res.title.clone(),
            exercise_url: res.url.clone(),
            description: res.description.clone(),
            difficulty: res.difficulty.unwrap_or(Difficulty::Medium),
            point_id: res.point_id,
            created_at: now,
            updated_at: now,
        });
        Ok(id)
    }

    async fn videos_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Video>> {
        let st = self.state.lock().await;
        Ok(st.videos.iter().filter(|v| v.point_id == point_id).cloned().collect())
    }

    async fn coursewares_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Courseware>> {
        let st = self.state.lock().await;
        Ok(st
            .coursewares
            .iter()
            .filter(|c| c.point_id == point_id)
            .cloned()
            .collect())
    }

    async fn exercises_by_point(&self, point_id: i64) -> anyhow::Result<Vec<Exercise>> {
        let st = self.state.lock().await;
        Ok(st
            .exercises
            .iter()
            .filter(|e| e.point_id == point_id)
            .cloned()
            .collect())
    }

    async fn delete_video(&self, id: i64, point_id: i64) -> anyhow::Result<bool> {
        let mut st = self.state.lock().await;
        let before = st.videos.len();
        st.videos.retain(|v| !(v.id == id && v.point_id == point_id));
        Ok(st.videos.len() < before)
    }

    async fn delete_courseware(&self, id: i64, point_id: i64) -> anyhow::Result<bool> {
        let mut st = self.state.lock().await;
        let before = st.coursewares.len();
        st.coursewares.retain(|c| !(c.id == id && c.point_id == point_id));
        Ok(st.coursewares.len() < before)
    }

    async fn delete_exercise(&self, id: i64, point_id: i64) -> anyhow::Result<bool> {
        let mut st = self.state.lock().await;
        let before = st.exercises.len();
        st.exercises.retain(|e| !(e.id == id && e.point_id == point_id));
        Ok(st.exercises.len() < before)
    }
}

// ---------- object store & media ----------

#[derive(Default)]
pub struct MemoryObjects {
    pub stored: Mutex<Vec<StoredObject>>,
    pub removed: Mutex<Vec<StoredObject>>,
    pub fail_bucket: Option<BucketKind>,
}

fn bucket_name(bucket: BucketKind) -> &'static str {
    match bucket {
        BucketKind::Video => "videos",
        BucketKind::Picture => "pics",
        BucketKind::File => "files",
    }
}

#[async_trait]
impl ObjectStore for MemoryObjects {
    async fn put_file(
        &self,
        bucket: BucketKind,
        key: &str,
        path: &Path,
        _content_type: &str,
    ) -> anyhow::Result<StoredObject> {
        if self.fail_bucket == Some(bucket) {
            anyhow::bail!("bucket {} unavailable", bucket_name(bucket));
        }
        anyhow::ensure!(path.exists(), "local file {} missing", path.display());
        let obj = StoredObject {
            bucket: bucket_name(bucket).to_string(),
            key: key.to_string(),
            url: format!("http://objects.test/{}/{}", bucket_name(bucket), key),
        };
        self.stored.lock().await.push(obj.clone());
        Ok(obj)
    }

    async fn remove(&self, object: &StoredObject) -> anyhow::Result<()> {
        self.stored.lock().await.retain(|o| o != object);
        self.removed.lock().await.push(object.clone());
        Ok(())
    }
}

pub struct FakeCover {
    pub succeed: bool,
}

#[async_trait]
impl CoverExtractor for FakeCover {
    async fn extract(&self, _video: &Path, dest: &Path) -> anyhow::Result<()> {
        if !self.succeed {
            anyhow::bail!("no frame");
        }
        tokio::fs::write(dest, b"jpeg").await?;
        Ok(())
    }
}

// ---------- fixtures ----------

/// Calculus chapter with two sections and two points, plus an unrelated Algebra chapter.
/// `Epsilon` is a prerequisite of `Chain rule`.
pub const SAMPLE_GRAPH: &str = r#"{
    "nodes": [
        {"name": "Calculus", "type": "chapter"},
        {"name": "Limits", "type": "section"},
        {"name": "Derivatives", "type": "section"},
        {"name": "Epsilon", "type": "point"},
        {"name": "Chain rule", "type": "point"},
        {"name": "Algebra", "type": "chapter"}
    ],
    "relations": [
        {"type": "contains", "source_type": "chapter", "target_type": "section", "source_name": "Calculus", "target_name": "Limits"},
        {"type": "contains", "source_type": "chapter", "target_type": "section", "source_name": "Calculus", "target_name": "Derivatives"},
        {"type": "contains", "source_type": "section", "target_type": "point", "source_name": "Limits", "target_name": "Epsilon"},
        {"type": "contains", "source_type": "section", "target_type": "point", "source_name": "Derivatives", "target_name": "Chain rule"},
        {"type": "prerequisite", "source_type": "point", "target_type": "point", "source_name": "Epsilon", "target_name": "Chain rule"},
        {"type": "related", "source_type": "chapter", "target_type": "chapter", "source_name": "Algebra", "target_name": "Calculus"}
    ]
}"#;

pub async fn seeded_graph() -> MemoryGraph {
    let graph = MemoryGraph::default();
    let doc = crate::domain::knowledge::import::ImportDocument::from_slice(SAMPLE_GRAPH.as_bytes())
        .unwrap()
        .validate()
        .unwrap();
    graph.import(&doc).await.unwrap();
    graph
}
