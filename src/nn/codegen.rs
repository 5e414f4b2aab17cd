/*
 * @Author       : 老董
 * @Date         : 2026-10-19
 * @Description  : 代码生成：把带形状标注的层链渲染为可独立运行的 PyTorch 脚本
 *
 * 生成要么整体成功，要么整体失败；不会返回半成品。
 * 生成的脚本包括模型类、参数计数、训练/评估循环以及使用占位随机数据的 `__main__` 块。
 */

use super::config::TrainingConfig;
use super::graph::Node;
use super::inference::{ShapeInfo, infer_shapes};
use super::layer::{LayerConfig, LayerKind, TraitLayer};
use super::shape::python_tuple;
use crate::errors::CodegenError;

/// 生成的模型类名
pub const MODEL_CLASS_NAME: &str = "NeuroFlowModel";

const IMPORTS: &str = "\
import torch
import torch.nn as nn
import torch.optim as optim
from torch.utils.data import DataLoader, TensorDataset
";

const SOFTMAX_NOTE: &str = "
        # NOTE: The final nn.Softmax layer is omitted because nn.CrossEntropyLoss
        #       combines LogSoftmax and NLLLoss in one class for better stability.
";

const TRAINING_LOOPS: &str = r#"
# ------------------- Utility Functions -------------------
def count_parameters(model):
    """Counts the number of trainable parameters in a model."""
    return sum(p.numel() for p in model.parameters() if p.requires_grad)

# ------------------- Main Training/Evaluation Logic -------------------
def train_epoch(model, dataloader, criterion, optimizer, device):
    """Main training loop for one epoch."""
    model.train()  # Set model to training mode
    running_loss = 0.0
    for i, (inputs, labels) in enumerate(dataloader):
        inputs, labels = inputs.to(device), labels.to(device)

        # Zero the parameter gradients
        optimizer.zero_grad()

        # Forward pass
        outputs = model(inputs)
        loss = criterion(outputs, labels)

        # Backward pass and optimize
        loss.backward()
        optimizer.step()

        running_loss += loss.item()

    avg_loss = running_loss / len(dataloader)
    print(f"  Training Loss: {avg_loss:.4f}")

def evaluate_epoch(model, dataloader, criterion, device):
    """Main evaluation loop for one epoch."""
    model.eval()  # Set model to evaluation mode
    running_loss = 0.0
    correct_predictions = 0
    total_samples = 0

    with torch.no_grad():  # Disable gradient calculations
        for inputs, labels in dataloader:
            inputs, labels = inputs.to(device), labels.to(device)

            outputs = model(inputs)
            loss = criterion(outputs, labels)
            running_loss += loss.item()

            # Calculate accuracy for classification tasks
            if isinstance(criterion, (nn.CrossEntropyLoss, nn.NLLLoss)):
                _, predicted = torch.max(outputs.data, 1)
                total_samples += labels.size(0)
                correct_predictions += (predicted == labels).sum().item()

    avg_loss = running_loss / len(dataloader)
    accuracy = (correct_predictions / total_samples) * 100 if total_samples > 0 else 0.0

    print(f"  Validation Loss: {avg_loss:.4f}" + (f", Accuracy: {accuracy:.2f}%" if accuracy > 0 else ""))
"#;

/// 生成 PyTorch 脚本
///
/// `ordered` 须为拓扑顺序（首节点为 Input）。以下情况返回错误：
/// - 训练配置无效；
/// - 链不以 Input 开始；
/// - 任一节点存在形状错误（错误中给出根因节点的名称）；
/// - 最终输出形状为空。
pub fn generate_pytorch_code(
    ordered: &[Node],
    config: &TrainingConfig,
) -> Result<String, CodegenError> {
    config.validate()?;

    match ordered.first() {
        Some(first) if first.is_input() => {}
        _ => return Err(CodegenError::MissingInput),
    }

    // 形状推断失败时直接返回，不生成半成品
    let infos = infer_shapes(ordered);
    if let Some((node, info)) = ordered
        .iter()
        .zip(&infos)
        .find(|(_, info)| info.is_root_cause())
    {
        if let Some(source) = info.error.clone() {
            return Err(CodegenError::InvalidShape {
                node: display_name(node),
                source,
            });
        }
    }

    let input_dims = infos
        .first()
        .and_then(|info| info.output_shape.dims())
        .ok_or(CodegenError::EmptyOutputShape)?;
    let output_dims = infos
        .last()
        .and_then(|info| info.output_shape.dims())
        .filter(|dims| !dims.is_empty())
        .ok_or(CodegenError::EmptyOutputShape)?;

    let model = model_definition(ordered, &infos, config, input_dims)?;
    let main = main_block(config, input_dims, output_dims);

    log::debug!(
        "已生成PyTorch脚本：{}个节点，输出形状{}",
        ordered.len(),
        python_tuple(output_dims)
    );

    let mut script = String::new();
    script.push_str(IMPORTS);
    script.push_str("\n# ------------------- Model Definition -------------------\n");
    script.push_str(&model);
    script.push_str(TRAINING_LOOPS);
    script.push_str(&main);
    Ok(script)
}

/// 模型类定义：每个非 Input 节点一条构造语句、一条前向语句
fn model_definition(
    ordered: &[Node],
    infos: &[ShapeInfo],
    config: &TrainingConfig,
    input_dims: &[usize],
) -> Result<String, CodegenError> {
    let mut layers: Vec<String> = Vec::new();
    let mut forwards: Vec<String> = Vec::new();
    let mut softmax_omitted = false;
    let last_index = ordered.len() - 1;

    for (index, (node, info)) in ordered.iter().zip(infos).enumerate().skip(1) {
        if index == last_index && node.kind == LayerKind::Softmax && config.combines_softmax() {
            softmax_omitted = true;
            continue;
        }

        let name = display_name(node);
        let input = info
            .input_shape
            .dims()
            .ok_or_else(|| CodegenError::MissingInputShape { node: name.clone() })?;
        let layer = LayerConfig::from_params(node.kind, &node.params).map_err(|source| {
            CodegenError::InvalidShape {
                node: name.clone(),
                source,
            }
        })?;

        let attr = format!("layer_{}", node.id);
        match layer.torch_constructor(input) {
            Some(constructor) => {
                layers.push(format!("        # {name}\n        self.{attr} = {constructor}"));
                forwards.push(format!("        {}", layer.torch_forward(&attr)));
            }
            None => {
                log::warn!("{node}的层类型未知，生成代码时跳过");
                layers.push(format!("        # {name}: unsupported layer type, skipped"));
            }
        }
    }

    let mut model = format!(
        "
class {MODEL_CLASS_NAME}(nn.Module):
    \"\"\"
    Neural network model designed with NeuroFlow.
    Input shape: {input_shape}
    \"\"\"
    def __init__(self):
        super({MODEL_CLASS_NAME}, self).__init__()
",
        input_shape = python_tuple(input_dims),
    );
    if !layers.is_empty() {
        model.push_str(&layers.join("\n\n"));
        model.push('\n');
    }
    if softmax_omitted {
        model.push_str(SOFTMAX_NOTE);
    }
    model.push_str("\n    def forward(self, x):\n");
    for forward in &forwards {
        model.push_str(forward);
        model.push('\n');
    }
    model.push_str("        return x\n");
    Ok(model)
}

/// `__main__` 块：占位数据、优化器与损失函数、训练循环
fn main_block(config: &TrainingConfig, input_dims: &[usize], output_dims: &[usize]) -> String {
    let targets = if config.is_classification() {
        let num_classes = output_dims.last().copied().unwrap_or(1);
        format!(
            "    # For classification, labels should be class indices (LongTensor)
    # The last dimension of the output shape is the number of classes.
    num_classes = {num_classes}
    placeholder_targets = torch.randint(0, num_classes, (BATCH_SIZE,))
"
        )
    } else {
        "    # For regression, targets should be floats matching the full output shape
    placeholder_targets = torch.randn(BATCH_SIZE, *output_shape)
"
        .to_string()
    };

    format!(
        r#"

# ------------------- Main Execution -------------------
if __name__ == '__main__':
    # --- Configuration ---
    EPOCHS = {epochs}
    BATCH_SIZE = {batch_size}
    LEARNING_RATE = {learning_rate}

    # --- Setup Device ---
    # Use GPU if available, otherwise fall back to CPU
    device = torch.device("cuda" if torch.cuda.is_available() else "cpu")
    print(f"Using device: {{device}}")

    # --- Setup Model ---
    model = {MODEL_CLASS_NAME}().to(device)
    print("\n--- Model Architecture ---")
    print(model)
    print(f"\nTotal Trainable Parameters: {{count_parameters(model):,}}")
    print("--------------------------\n")

    # --- Create Placeholder Data ---
    # IMPORTANT: Replace this with your actual data loading logic.
    # This code creates random tensors for demonstration purposes.
    print("Creating placeholder data loaders (replace with your actual data)...")

    input_shape_tuple = {input_shape}
    sample_input_shape = (BATCH_SIZE,) + input_shape_tuple
    placeholder_inputs = torch.randn(*sample_input_shape)

    output_shape = {output_shape}

{targets}
    # Create a Dataset and DataLoader
    # Use this structure for both your training and validation data
    placeholder_dataset = TensorDataset(placeholder_inputs, placeholder_targets)
    # In a real scenario, you'd have a train_loader and a val_loader
    train_loader = DataLoader(placeholder_dataset, batch_size=BATCH_SIZE, shuffle=True)
    val_loader = DataLoader(placeholder_dataset, batch_size=BATCH_SIZE)  # No shuffle for validation
    print("Placeholder data created.\n")
    # --- End of Placeholder Data Section ---

    # --- Setup Optimizer and Loss Function ---
    optimizer = optim.{optimizer}(model.parameters(), lr=LEARNING_RATE)
    criterion = nn.{loss}()

    # --- Training Loop ---
    print("--- Starting Training ---")
    for epoch in range(1, EPOCHS + 1):
        print(f"Epoch {{epoch}}/{{EPOCHS}}:")
        train_epoch(model, train_loader, criterion, optimizer, device)
        evaluate_epoch(model, val_loader, criterion, device)
        print("-" * 25)

    print("Finished Training.")
"#,
        epochs = config.epochs,
        batch_size = config.batch_size,
        learning_rate = config.learning_rate,
        input_shape = python_tuple(input_dims),
        output_shape = python_tuple(output_dims),
        optimizer = config.optimizer.torch_name(),
        loss = config.loss_function.torch_name(),
    )
}

/// 节点名称（去掉换行，避免破坏生成的注释）
fn display_name(node: &Node) -> String {
    node.name.replace(['\r', '\n'], " ")
}
